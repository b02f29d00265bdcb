use playlist_core::domain::{ChannelRecord, DEFAULT_REGION};
use playlist_core::error::WriteError;
use playlist_core::partition::{by_group_file, by_region_file, Bucket};
use playlist_core::ports::{PlaylistWriter, WriteReport};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

pub const PLAYLIST_HEADER: &str = "#EXTM3U";

/// Writes the merged playlist to one file and its group/region partitions
/// into a directory.
pub struct M3uPlaylistWriter {
    output_file: PathBuf,
    output_dir: PathBuf,
}

impl M3uPlaylistWriter {
    pub fn new(output_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            output_dir: output_dir.into(),
        }
    }

    fn write_file(&self, path: PathBuf, content: String, report: &mut WriteReport) {
        match fs::write(&path, content) {
            Ok(()) => report.written.push(path),
            Err(source) => {
                let e = WriteError::WriteFile { path, source };
                error!("{}", e);
                report.failed.push(e);
            }
        }
    }

    fn write_buckets(&self, buckets: &[Bucket<'_, String>], report: &mut WriteReport) {
        for bucket in buckets {
            let path = self.output_dir.join(&bucket.key);
            self.write_file(path, format_playlist(bucket.records.iter().copied()), report);
        }
    }
}

/// One metadata line. `tvg-country` and `tvg-name` are only added when the
/// plain `group-title` form would lose the region or split the name.
pub fn format_entry(record: &ChannelRecord) -> String {
    let mut attributes = String::new();
    if record.name.contains(',') {
        attributes.push_str(&format!(" tvg-name=\"{}\"", record.name));
    }
    if record.region_code != DEFAULT_REGION {
        attributes.push_str(&format!(" tvg-country=\"{}\"", record.region_code));
    }
    format!(
        "#EXTINF:-1{} group-title=\"{}\",{}\n{}\n",
        attributes, record.group, record.name, record.stream_url
    )
}

pub fn format_playlist<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ChannelRecord>,
{
    let mut output = String::from(PLAYLIST_HEADER);
    output.push('\n');
    for record in records {
        output.push_str(&format_entry(record));
    }
    output
}

impl PlaylistWriter for M3uPlaylistWriter {
    fn write_all(&self, records: &[ChannelRecord]) -> WriteReport {
        let mut report = WriteReport::default();

        self.write_file(self.output_file.clone(), format_playlist(records), &mut report);
        if report.is_success() {
            info!("Full list saved to {}", self.output_file.display());
        }

        let groups = by_group_file(records);
        let regions = by_region_file(records);

        // Create output directory if it doesn't exist
        if let Err(source) = fs::create_dir_all(&self.output_dir) {
            let e = WriteError::CreateDir {
                path: self.output_dir.clone(),
                source,
            };
            error!("{}", e);
            report.failed.push(e);
            report.skipped.extend(
                groups
                    .iter()
                    .chain(regions.iter())
                    .map(|bucket| self.output_dir.join(&bucket.key)),
            );
            return report;
        }

        self.write_buckets(&groups, &mut report);
        info!("{} group files saved in {}", groups.len(), self.output_dir.display());

        self.write_buckets(&regions, &mut report);
        info!("{} region files saved in {}", regions.len(), self.output_dir.display());

        report
    }
}
