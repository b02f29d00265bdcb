use crate::domain::ChannelRecord;
use crate::error::{FetchError, WriteError};
use std::path::PathBuf;

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Port for retrieving the raw text of one playlist source.
pub trait SourceFetcher {
    fn fetch(&self, location: &str) -> Result<String>;
}

/// Port for persisting the merged list and its partitions.
/// Implementations write every file they can and report the rest.
pub trait PlaylistWriter {
    fn write_all(&self, records: &[ChannelRecord]) -> WriteReport;
}

#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<WriteError>,
    /// Files not attempted because their directory could not be created.
    pub skipped: Vec<PathBuf>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}
