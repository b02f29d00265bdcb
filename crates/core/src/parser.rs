//! Line-oriented playlist parser.
//!
//! A metadata line (`#EXTINF...`) fills a pending slot; the next stream
//! location line (`http...`) resolves it into a [`ChannelRecord`]. Nothing in
//! here fails: malformed lines degrade to default field values or are dropped.

use crate::domain::{ChannelRecord, DEFAULT_GROUP, DEFAULT_REGION};
use tracing::trace;

pub const METADATA_MARKER: &str = "#EXTINF";
pub const LOCATION_PREFIX: &str = "http";

const NAME_KEY: &str = "tvg-name";
const GROUP_KEY: &str = "group-title";
const REGION_KEY: &str = "tvg-country";

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingChannel {
    name: String,
    group: String,
    region_code: String,
}

#[derive(Debug, Default)]
enum ParseState {
    #[default]
    AwaitingMetadata,
    AwaitingLocation(PendingChannel),
}

/// Incremental parser. Feed lines in order, then call [`PlaylistParser::finish`].
#[derive(Debug, Default)]
pub struct PlaylistParser {
    state: ParseState,
    records: Vec<ChannelRecord>,
}

impl PlaylistParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();

        if line.starts_with(METADATA_MARKER) {
            // A newer metadata line always replaces whatever was pending,
            // including the name: a nameless line does not inherit the
            // previous line's name, so its location is dropped.
            self.state = match pending_from_metadata(line) {
                Some(pending) => ParseState::AwaitingLocation(pending),
                None => ParseState::AwaitingMetadata,
            };
        } else if line.starts_with(LOCATION_PREFIX) {
            match std::mem::take(&mut self.state) {
                ParseState::AwaitingLocation(pending) => {
                    self.records.push(ChannelRecord {
                        name: pending.name,
                        stream_url: line.to_string(),
                        group: pending.group,
                        region_code: pending.region_code,
                    });
                }
                ParseState::AwaitingMetadata => {
                    trace!("dropping location without metadata: {}", line);
                }
            }
        }
    }

    pub fn finish(self) -> Vec<ChannelRecord> {
        if let ParseState::AwaitingLocation(pending) = &self.state {
            trace!("input ended before a location for {:?}", pending.name);
        }
        self.records
    }
}

/// Parses a whole playlist text into channel records, in input order.
pub fn parse(text: &str) -> Vec<ChannelRecord> {
    let mut parser = PlaylistParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

fn pending_from_metadata(line: &str) -> Option<PendingChannel> {
    let attributes = scan_attributes(line);

    let name = attribute(&attributes, NAME_KEY)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| {
            line.rsplit_once(',')
                .map(|(_, title)| title.trim())
                .filter(|title| !title.is_empty())
        })?;

    let group = attribute(&attributes, GROUP_KEY)
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_GROUP.to_string());

    let region_code = attribute(&attributes, REGION_KEY)
        .map(|value| value.trim().to_uppercase())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    Some(PendingChannel {
        name: name.to_string(),
        group,
        region_code,
    })
}

fn attribute<'a>(attributes: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map(|(_, value)| *value)
}

/// Scans the `key=value` pairs of a metadata line.
///
/// Values may be double-quoted or bare. An unterminated quote runs to the end
/// of the line. Bare words without `=` (the duration, stray text) are skipped,
/// and a comma outside quotes ends the attribute section.
pub fn scan_attributes(line: &str) -> Vec<(&str, &str)> {
    let rest = line.strip_prefix(METADATA_MARKER).unwrap_or(line);
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let bytes = rest.as_bytes();
    let len = bytes.len();
    let is_delimiter = |b: u8| b.is_ascii_whitespace() || b == b',';

    let mut attributes = Vec::new();
    let mut pos = 0;

    loop {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len || bytes[pos] == b',' {
            break;
        }

        let key_start = pos;
        while pos < len && !is_delimiter(bytes[pos]) && bytes[pos] != b'=' {
            pos += 1;
        }
        let key = &rest[key_start..pos];

        if pos < len && bytes[pos] == b'=' {
            pos += 1;
            let value = if pos < len && bytes[pos] == b'"' {
                let start = pos + 1;
                match rest[start..].find('"') {
                    Some(offset) => {
                        pos = start + offset + 1;
                        &rest[start..start + offset]
                    }
                    None => {
                        pos = len;
                        &rest[start..]
                    }
                }
            } else {
                let start = pos;
                while pos < len && !is_delimiter(bytes[pos]) {
                    pos += 1;
                }
                &rest[start..pos]
            };

            if !key.is_empty() {
                attributes.push((key, value));
            }
        }
    }

    attributes
}
