//! URL modeling and filename derivation.
//!
//! Scan records carry a display/save filename derived from the submitted
//! URL path, sanitized for Linux filesystems.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Placeholder when the URL path yields nothing usable.
const PLACEHOLDER_FILENAME: &str = "unknown_file";

/// Derives the filename recorded for a scan and used when saving the fetch.
///
/// Takes the last path segment of `url` (query and fragment ignored) and
/// sanitizes it for Linux (no `/`, NUL, or control chars; no leading/trailing
/// dots or spaces). URLs with no usable segment map to `"unknown_file"`.
///
/// # Examples
///
/// - `scan_filename("https://example.com/pkg/tool.tar.gz")` → `"tool.tar.gz"`
/// - `scan_filename("https://example.com/")` → `"unknown_file"`
pub fn scan_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(seg) => seg,
        None => return PLACEHOLDER_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        PLACEHOLDER_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_filename_from_url_path() {
        assert_eq!(
            scan_filename("https://example.com/files/setup.exe"),
            "setup.exe"
        );
        assert_eq!(
            scan_filename("https://cdn.example.com/a/b/image-2024.iso"),
            "image-2024.iso"
        );
    }

    #[test]
    fn scan_filename_ignores_query() {
        assert_eq!(
            scan_filename("https://example.com/bundle.zip?token=abc&x=1"),
            "bundle.zip"
        );
    }

    #[test]
    fn scan_filename_placeholder_for_bare_host() {
        assert_eq!(scan_filename("https://example.com/"), "unknown_file");
        assert_eq!(scan_filename("https://example.com"), "unknown_file");
    }

    #[test]
    fn scan_filename_placeholder_for_trailing_slash() {
        assert_eq!(scan_filename("https://example.com/downloads/"), "unknown_file");
        assert_eq!(scan_filename("https://example.com/a/b/"), "unknown_file");
    }

    #[test]
    fn scan_filename_placeholder_for_unparsable() {
        assert_eq!(scan_filename("not a url"), "unknown_file");
        assert_eq!(scan_filename(""), "unknown_file");
    }

    #[test]
    fn scan_filename_reserved_segments() {
        assert_eq!(scan_filename("https://example.com/."), "unknown_file");
        assert_eq!(scan_filename("https://example.com/.."), "unknown_file");
    }
}
