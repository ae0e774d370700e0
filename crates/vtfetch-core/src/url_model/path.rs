//! Filename extraction from URL path.

/// Extracts the final path segment of a URL.
///
/// Returns `None` when the URL does not parse, the path ends in a slash
/// (empty final segment), or the segment is a reserved name.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
