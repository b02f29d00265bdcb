mod config;

use clap::Parser;
use config::{ConfigFile, Overrides};
use http_adapter::HttpSourceFetcher;
use m3u_adapter::M3uPlaylistWriter;
use playlist_core::application::{AggregationService, RunReport, RunStatus};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit code for configuration and startup errors.
const CONFIG_ERROR_EXIT: i32 = 1;

/// Comma-separated source list, used when no `--source` flag is given.
const SOURCES_ENV: &str = "IPTV_MERGE_SOURCES";

/// Merges remote IPTV playlists into one deduplicated list, split by group and country
#[derive(Parser, Debug)]
#[command(name = "iptv-merge")]
#[command(about = "Merges remote M3U channel lists and writes per-group and per-country playlists")]
struct Cli {
    /// TOML config file (defaults to ./iptv-merge.toml when present)
    #[arg(short = 'c', long = "config", env = "IPTV_MERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Source playlist URL; repeat to add more, fetched in the given order
    /// [env: IPTV_MERGE_SOURCES, comma separated]
    #[arg(short = 's', long = "source")]
    sources: Vec<String>,

    /// Path where the merged playlist will be written
    #[arg(short = 'o', long = "output-file", env = "IPTV_MERGE_OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Directory for the per-group and per-country playlists
    #[arg(short = 'd', long = "output-dir", env = "IPTV_MERGE_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Request timeout per source, in seconds
    #[arg(long = "timeout-secs", env = "IPTV_MERGE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log level; RUST_LOG takes precedence when set
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Write the default configuration to this path and exit
    #[arg(long = "write-default-config", value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

impl Cli {
    fn overrides(self) -> Overrides {
        let sources = if self.sources.is_empty() {
            split_sources(std::env::var(SOURCES_ENV).ok().as_deref())
        } else {
            self.sources
        };
        Overrides {
            config_path: self.config,
            sources,
            output_file: self.output_file,
            output_dir: self.output_dir,
            timeout_secs: self.timeout_secs,
            log_level: self.log_level,
        }
    }
}

/// Splits the environment source list. Flag values are never split, so a URL
/// with a comma in its query must be given with `--source`.
fn split_sources(value: Option<&str>) -> Vec<String> {
    value
        .map(|list| list.split(',').map(|entry| entry.trim().to_string()).collect())
        .unwrap_or_default()
}

fn main() {
    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        match ConfigFile::default().to_file(path) {
            Ok(()) => {
                println!("Default configuration written to {}", path.display());
                return;
            }
            Err(e) => {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(CONFIG_ERROR_EXIT);
            }
        }
    }

    let config = match config::load(cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(CONFIG_ERROR_EXIT);
        }
    };

    init_logging(&config.log_level);
    info!(
        "{} enabled sources, output {} and {}",
        config.sources.len(),
        config.output_file.display(),
        config.output_dir.display()
    );

    let fetcher = match HttpSourceFetcher::new(config.timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            std::process::exit(CONFIG_ERROR_EXIT);
        }
    };
    let writer = M3uPlaylistWriter::new(config.output_file.clone(), config.output_dir.clone());

    // Instantiate the core service with its adapters
    let service = AggregationService::new(Box::new(fetcher), Box::new(writer));

    let report = service.run(&config.sources);
    log_summary(&report);
    std::process::exit(report.status().exit_code());
}

fn log_summary(report: &RunReport) {
    info!(
        "Fetched {}/{} sources, {} channels parsed, {} after dedup, in {} ms",
        report.sources_fetched,
        report.sources_attempted,
        report.channels_parsed,
        report.channels_merged,
        report.elapsed_ms()
    );
    for (location, e) in &report.failed_sources {
        warn!("Source skipped: {} ({})", location, e);
    }
    if let Some(write) = &report.write {
        info!("{} files written", write.written.len());
        for e in &write.failed {
            warn!("Not written: {}", e);
        }
        for path in &write.skipped {
            warn!("Skipped: {}", path.display());
        }
    }
    match report.status() {
        RunStatus::Success => info!("Finished at {}", report.finished_at.format("%Y-%m-%d %H:%M:%S")),
        RunStatus::PartialSources => warn!("Finished with some sources unavailable"),
        RunStatus::NoSourcesReachable => warn!("No source reachable, nothing written"),
        RunStatus::WriteFailed => warn!("Finished with write errors"),
    }
}

/// Initialize logging with tracing
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
