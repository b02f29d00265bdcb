use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve one source. Recovered by skipping that source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("could not read response body: {0}")]
    Body(String),

    #[error("response body is empty")]
    EmptyBody,
}

/// Failure to produce one output file. Sibling files are still written.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    pub fn path(&self) -> &PathBuf {
        match self {
            WriteError::CreateDir { path, .. } | WriteError::WriteFile { path, .. } => path,
        }
    }
}

/// Configuration problems. These abort the run before anything is fetched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no enabled sources configured")]
    NoSources,
}
