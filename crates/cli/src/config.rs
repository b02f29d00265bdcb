//! Configuration file support
//!
//! Settings come from, in order of precedence: command-line flags and their
//! environment variables, a TOML file, then built-in defaults.

use playlist_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "iptv-merge.toml";

/// Marks a disabled source entry.
const DISABLED_PREFIX: char = '#';

/// Configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Playlist URLs, fetched in this order. Entries starting with `#` are skipped.
    pub sources: Vec<String>,
    /// Path of the merged playlist
    pub output_file: PathBuf,
    /// Directory for per-group and per-region playlists
    pub output_dir: PathBuf,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            sources: vec![
                "https://iptv-org.github.io/iptv/index.m3u".to_string(),
                "#https://raw.githubusercontent.com/dongyubin/IPTV/main/IPTV.m3u".to_string(),
                "https://raw.githubusercontent.com/Guovin/iptv-api/gd/output/result.m3u"
                    .to_string(),
                "#https://raw.githubusercontent.com/xiaoxiaozhou-zcx/IPTV/main/iptv.m3u"
                    .to_string(),
            ],
            output_file: PathBuf::from("merged.m3u"),
            output_dir: PathBuf::from("output_m3u"),
            timeout_secs: 20,
            log_level: "info".to_string(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub sources: Vec<String>,
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub sources: Vec<String>,
    pub output_file: PathBuf,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub log_level: String,
}

/// Reads the config file (explicit path, or the default one if present) and
/// applies the overrides on top.
pub fn load(overrides: Overrides) -> Result<AppConfig, ConfigError> {
    let file = match &overrides.config_path {
        Some(path) => ConfigFile::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            ConfigFile::from_file(DEFAULT_CONFIG_PATH)?
        }
        None => ConfigFile::default(),
    };
    resolve(file, overrides)
}

pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<AppConfig, ConfigError> {
    let entries = if overrides.sources.is_empty() {
        file.sources
    } else {
        overrides.sources
    };
    let sources = enabled_sources(&entries);
    if sources.is_empty() {
        return Err(ConfigError::NoSources);
    }

    Ok(AppConfig {
        sources,
        output_file: overrides.output_file.unwrap_or(file.output_file),
        output_dir: overrides.output_dir.unwrap_or(file.output_dir),
        timeout: Duration::from_secs(overrides.timeout_secs.unwrap_or(file.timeout_secs)),
        log_level: overrides.log_level.unwrap_or(file.log_level),
    })
}

/// Drops blank, disabled and repeated entries, keeping the configured order.
pub fn enabled_sources(entries: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for entry in entries.iter().map(|e| e.trim()) {
        if entry.is_empty() {
            continue;
        }
        if entry.starts_with(DISABLED_PREFIX) {
            debug!("Skipping disabled source {}", entry);
            continue;
        }
        if seen.insert(entry) {
            sources.push(entry.to_string());
        }
    }
    sources
}
