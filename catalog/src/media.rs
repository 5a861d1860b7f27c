//! Media URL resolution.

/// Resolve an image path from the API against `base_url`.
///
/// Absolute URLs are returned unchanged; root-relative and relative paths
/// are joined onto the base.
#[must_use]
pub fn resolve_media_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
