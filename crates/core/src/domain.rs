/// Group assigned when a metadata line carries no `group-title`.
pub const DEFAULT_GROUP: &str = "Other";

/// Region assigned when a metadata line carries no `tvg-country`.
pub const DEFAULT_REGION: &str = "Unknown";

/// One channel of a playlist. `name` is the merge key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub name: String,
    pub stream_url: String,
    pub group: String,
    pub region_code: String, // upper-case
}

impl ChannelRecord {
    pub fn new(
        name: impl Into<String>,
        stream_url: impl Into<String>,
        group: impl Into<String>,
        region_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            stream_url: stream_url.into(),
            group: group.into(),
            region_code: region_code.into(),
        }
    }
}
