use crate::error::FetchError;
use crate::merge::MergedPlaylist;
use crate::parser;
use crate::ports::{PlaylistWriter, SourceFetcher, WriteReport};
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Application service: fetch every source in order, parse, merge, then hand
/// the merged list to the writer.
pub struct AggregationService {
    fetcher: Box<dyn SourceFetcher>,
    writer: Box<dyn PlaylistWriter>,
}

/// Outcome of a run, mapped to the process exit code by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    PartialSources,
    NoSourcesReachable,
    WriteFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::PartialSources => 3,
            RunStatus::NoSourcesReachable => 4,
            RunStatus::WriteFailed => 5,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub sources_attempted: usize,
    pub sources_fetched: usize,
    pub failed_sources: Vec<(String, FetchError)>,
    pub channels_parsed: usize,
    pub channels_merged: usize,
    /// `None` when nothing was reachable and no file was touched.
    pub write: Option<WriteReport>,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        match &self.write {
            None => RunStatus::NoSourcesReachable,
            Some(write) if !write.is_success() => RunStatus::WriteFailed,
            Some(_) if !self.failed_sources.is_empty() => RunStatus::PartialSources,
            Some(_) => RunStatus::Success,
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

impl AggregationService {
    /// Creates a new AggregationService with the given dependencies
    pub fn new(fetcher: Box<dyn SourceFetcher>, writer: Box<dyn PlaylistWriter>) -> Self {
        Self { fetcher, writer }
    }

    /// Fetches and merges all sources, in order, into one playlist.
    /// Failed sources are logged and recorded, never fatal.
    pub fn collect(&self, sources: &[String], report: &mut RunReport) -> MergedPlaylist {
        let mut merged = MergedPlaylist::new();

        for location in sources {
            report.sources_attempted += 1;
            info!("Downloading: {}", location);

            // A blank body is no better than no answer.
            let fetched = self.fetcher.fetch(location).and_then(|text| {
                if text.trim().is_empty() {
                    Err(FetchError::EmptyBody)
                } else {
                    Ok(text)
                }
            });
            let text = match fetched {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to download {}: {}", location, e);
                    report.failed_sources.push((location.clone(), e));
                    continue;
                }
            };
            report.sources_fetched += 1;

            let records = parser::parse(&text);
            let parsed = records.len();
            let added = merged.absorb(records);
            report.channels_parsed += parsed;
            info!(
                "{}: {} channels parsed, {} new after dedup",
                location, parsed, added
            );
        }

        merged
    }

    /// Runs the whole pipeline. Nothing is written when no source answered,
    /// so a previous good output survives an outage.
    pub fn run(&self, sources: &[String]) -> RunReport {
        let started_at = Local::now();
        let mut report = RunReport {
            started_at,
            finished_at: started_at,
            sources_attempted: 0,
            sources_fetched: 0,
            failed_sources: Vec::new(),
            channels_parsed: 0,
            channels_merged: 0,
            write: None,
        };

        let merged = self.collect(sources, &mut report);
        report.channels_merged = merged.len();
        info!("Total merged channels: {}", merged.len());

        if report.sources_fetched == 0 {
            warn!("No source was reachable; leaving existing output untouched");
        } else {
            if merged.is_empty() {
                warn!("Sources were reachable but no channel was parsed");
            }
            report.write = Some(self.writer.write_all(merged.records()));
        }

        report.finished_at = Local::now();
        report
    }
}
