use crate::domain::ChannelRecord;
use std::collections::HashMap;

/// Deduplicated channel list keyed by name. The first record seen for a name
/// is kept; iteration follows first insertion.
#[derive(Debug, Default, Clone)]
pub struct MergedPlaylist {
    records: Vec<ChannelRecord>,
    index: HashMap<String, usize>,
}

impl MergedPlaylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts records whose name is not yet present. Returns how many were added.
    pub fn absorb<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ChannelRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.index.contains_key(&record.name) {
                continue;
            }
            self.index.insert(record.name.clone(), self.records.len());
            self.records.push(record);
            added += 1;
        }
        added
    }

    pub fn get(&self, name: &str) -> Option<&ChannelRecord> {
        self.index.get(name).map(|&position| &self.records[position])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ChannelRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ChannelRecord> {
        self.records
    }
}

/// Merges sources in the given order.
pub fn merge<S>(sources: S) -> MergedPlaylist
where
    S: IntoIterator<Item = Vec<ChannelRecord>>,
{
    let mut merged = MergedPlaylist::new();
    for source in sources {
        merged.absorb(source);
    }
    merged
}
