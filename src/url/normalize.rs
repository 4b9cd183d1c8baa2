use crate::url::domain::{has_scheme_prefix, split_url};
use url::Url;

/// Normalizes a raw href into the canonical form used for deduplication
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; empty input yields `None`
/// 2. Protocol-relative (`//host/path`): prefix the base's scheme
/// 3. Root-relative (`/path`): prefix the base's `scheme://authority`
/// 4. No `scheme://` prefix: resolve against the base with standard
///    relative-reference resolution
/// 5. Otherwise: already absolute, taken as-is
/// 6. Remove the fragment (everything from `#`)
///
/// Paths and queries are otherwise preserved byte for byte: no case folding,
/// no trailing-slash handling, no percent-decoding. Two URLs that differ only
/// by a trailing slash stay two URLs.
///
/// # Arguments
///
/// * `raw` - The href or URL string to normalize
/// * `base` - The absolute URL the href was found on
///
/// # Returns
///
/// * `Some(String)` - The canonical URL
/// * `None` - Empty input, or a base that cannot anchor the reference
///
/// # Examples
///
/// ```
/// use seo_sweep::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("/a/b", "https://x.com/p").as_deref(),
///     Some("https://x.com/a/b")
/// );
/// assert_eq!(
///     normalize_url("//cdn.x.com/y", "https://x.com").as_deref(),
///     Some("https://cdn.x.com/y")
/// );
/// assert_eq!(
///     normalize_url("https://x.com/p#frag", "https://x.com").as_deref(),
///     Some("https://x.com/p")
/// );
/// ```
pub fn normalize_url(raw: &str, base: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let absolute = if let Some(rest) = raw.strip_prefix("//") {
        let parts = split_url(base)?;
        format!("{}://{}", parts.scheme, rest)
    } else if raw.starts_with('/') {
        let parts = split_url(base)?;
        format!("{}://{}{}", parts.scheme, parts.authority, raw)
    } else if has_scheme_prefix(raw) {
        raw.to_string()
    } else {
        resolve_relative(raw, base)?
    };

    Some(strip_fragment(&absolute).to_string())
}

/// Resolves a relative reference (`page`, `../up`, `?q=1`, `#top`) against a base
fn resolve_relative(raw: &str, base: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(raw).ok().map(String::from)
}

/// Drops everything from the first `#`
fn strip_fragment(url: &str) -> &str {
    match url.split_once('#') {
        Some((before, _)) => before,
        None => url,
    }
}
