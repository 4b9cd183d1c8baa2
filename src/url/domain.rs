/// The scheme, authority and remainder of an absolute URL string
///
/// The parts borrow from the original string, so nothing is re-serialized:
/// host casing, ports and paths come back exactly as they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Scheme without the `://` separator (e.g. "https")
    pub scheme: &'a str,

    /// Authority component: `[userinfo@]host[:port]`
    pub authority: &'a str,

    /// Everything after the authority: path, query and fragment
    pub rest: &'a str,
}

/// Splits an absolute `scheme://authority/rest` URL into its parts
///
/// Returns `None` when the string has no `scheme://` prefix.
///
/// # Examples
///
/// ```
/// use seo_sweep::url::split_url;
///
/// let parts = split_url("https://example.com:8080/a?b=1").unwrap();
/// assert_eq!(parts.scheme, "https");
/// assert_eq!(parts.authority, "example.com:8080");
/// assert_eq!(parts.rest, "/a?b=1");
///
/// assert!(split_url("/relative/path").is_none());
/// ```
pub fn split_url(url: &str) -> Option<UrlParts<'_>> {
    let (scheme, after) = url.split_once("://")?;
    if !is_scheme(scheme) {
        return None;
    }

    let end = after.find(&['/', '?', '#'][..]).unwrap_or(after.len());

    Some(UrlParts {
        scheme,
        authority: &after[..end],
        rest: &after[end..],
    })
}

/// Returns true if the string carries a `scheme://` prefix
pub fn has_scheme_prefix(url: &str) -> bool {
    split_url(url).is_some()
}

/// Extracts the authority (`host[:port]`) of a URL
///
/// URLs without an authority (relative references, `mailto:` and friends)
/// yield `None`.
pub fn authority(url: &str) -> Option<&str> {
    split_url(url)
        .map(|parts| parts.authority)
        .filter(|authority| !authority.is_empty())
}

/// Builds the `scheme://authority` origin that robots.txt and sitemaps live under
///
/// # Examples
///
/// ```
/// use seo_sweep::url::origin;
///
/// assert_eq!(
///     origin("https://example.com/blog/post?id=1"),
///     Some("https://example.com".to_string())
/// );
/// ```
pub fn origin(url: &str) -> Option<String> {
    let parts = split_url(url)?;
    if parts.authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}", parts.scheme, parts.authority))
}

/// Checks whether two URLs share the same authority
///
/// Only the authority is compared, byte for byte; scheme differences are
/// ignored. A URL without an authority never matches anything.
///
/// # Examples
///
/// ```
/// use seo_sweep::url::is_same_domain;
///
/// assert!(is_same_domain("https://x.com/a", "https://x.com/b"));
/// assert!(is_same_domain("http://x.com/a", "https://x.com/b"));
/// assert!(!is_same_domain("https://x.com", "https://y.com"));
/// ```
pub fn is_same_domain(a: &str, b: &str) -> bool {
    match (authority(a), authority(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
