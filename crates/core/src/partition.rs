//! Derived views over a merged record list: one bucket per group and one per
//! region. Buckets appear in the order their key is first seen and keep the
//! records in merged order.

use crate::domain::ChannelRecord;
use crate::utils::{group_file_name, region_file_name};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<'a, K = &'a str> {
    pub key: K,
    pub records: Vec<&'a ChannelRecord>,
}

pub fn partition<'a, K, F>(records: &'a [ChannelRecord], key_of: F) -> Vec<Bucket<'a, K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a ChannelRecord) -> K,
{
    let mut buckets: Vec<Bucket<'a, K>> = Vec::new();
    let mut positions: HashMap<K, usize> = HashMap::new();

    for record in records {
        let key = key_of(record);
        let position = *positions.entry(key.clone()).or_insert_with(|| {
            buckets.push(Bucket {
                key,
                records: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[position].records.push(record);
    }

    buckets
}

/// Group buckets keyed by output file name. Labels that sanitize to the same
/// name ("Live Sports", "Live_Sports") share one bucket.
pub fn by_group_file(records: &[ChannelRecord]) -> Vec<Bucket<'_, String>> {
    partition(records, |record| group_file_name(&record.group))
}

pub fn by_region_file(records: &[ChannelRecord]) -> Vec<Bucket<'_, String>> {
    partition(records, |record| region_file_name(&record.region_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ChannelRecord> {
        vec![
            ChannelRecord::new("CNN", "http://cnn", "News", "US"),
            ChannelRecord::new("ESPN", "http://espn", "Sports", "US"),
            ChannelRecord::new("BBC", "http://bbc", "News", "UK"),
            ChannelRecord::new("Local", "http://local", "Other", "Unknown"),
        ]
    }

    fn by_group(records: &[ChannelRecord]) -> Vec<Bucket<'_>> {
        partition(records, |record| record.group.as_str())
    }

    fn by_region(records: &[ChannelRecord]) -> Vec<Bucket<'_>> {
        partition(records, |record| record.region_code.as_str())
    }

    fn names<'a, K>(bucket: &Bucket<'a, K>) -> Vec<&'a str> {
        bucket.records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_by_group_keeps_first_seen_order() {
        let records = sample();
        let buckets = by_group(&records);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["News", "Sports", "Other"]);
        assert_eq!(names(&buckets[0]), vec!["CNN", "BBC"]);
    }

    #[test]
    fn test_by_region() {
        let records = sample();
        let buckets = by_region(&records);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["US", "UK", "Unknown"]);
        assert_eq!(names(&buckets[0]), vec!["CNN", "ESPN"]);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let records = sample();
        for buckets in [by_group(&records), by_region(&records)] {
            let total: usize = buckets.iter().map(|b| b.records.len()).sum();
            assert_eq!(total, records.len());
            for record in &records {
                let hits = buckets
                    .iter()
                    .filter(|b| b.records.iter().any(|r| r.name == record.name))
                    .count();
                assert_eq!(hits, 1);
            }
        }
    }

    #[test]
    fn test_by_group_file_merges_colliding_labels() {
        let records = vec![
            ChannelRecord::new("A", "http://a", "Live Sports", "US"),
            ChannelRecord::new("B", "http://b", "News", "US"),
            ChannelRecord::new("C", "http://c", "Live_Sports", "US"),
            ChannelRecord::new("D", "http://d", "News/Politics", "US"),
            ChannelRecord::new("E", "http://e", "News-Politics", "US"),
        ];
        let buckets = by_group_file(&records);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["group_Live_Sports.m3u", "group_News.m3u", "group_News-Politics.m3u"]
        );
        assert_eq!(names(&buckets[0]), vec!["A", "C"]);
        assert_eq!(names(&buckets[2]), vec!["D", "E"]);
    }

    #[test]
    fn test_by_region_file() {
        let records = sample();
        let keys: Vec<String> = by_region_file(&records).into_iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["US.m3u", "UK.m3u", "Unknown.m3u"]);
    }

    #[test]
    fn test_partition_empty() {
        assert!(by_group_file(&[]).is_empty());
    }
}
