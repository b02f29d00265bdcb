/// Extension used for every playlist file the tool writes.
pub const PLAYLIST_EXTENSION: &str = "m3u";

/// Sanitizes a bucket label for use in a filename.
/// Whitespace becomes `_`; path separators and other invalid filename
/// characters become `-`.
pub fn sanitize_filename(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_whitespace() => '_',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

pub fn group_file_name(group: &str) -> String {
    format!("group_{}.{}", sanitize_filename(group), PLAYLIST_EXTENSION)
}

pub fn region_file_name(region_code: &str) -> String {
    format!("{}.{}", sanitize_filename(region_code), PLAYLIST_EXTENSION)
}
