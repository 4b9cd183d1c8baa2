//! HTML link extraction
//!
//! Pulls `<a href>` values out of a page and turns them into canonical,
//! same-domain URLs. Anything that does not normalize (or that points to
//! another authority, including `mailto:` and `javascript:` hrefs, which
//! have none) is dropped.

use crate::url::{is_same_domain, normalize_url};
use indexmap::IndexSet;
use scraper::{Html, Selector};

/// Returns the raw `href` of every `<a>` element, in document order
///
/// # Example
///
/// ```
/// use seo_sweep::crawler::extract_hrefs;
///
/// let html = r#"<a href="/a">A</a><a>no href</a><a href=" b ">B</a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/a", " b "]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extracts the canonical same-domain links of a page
///
/// Each href is normalized against `page_url`; duplicates collapse to their
/// first occurrence.
pub fn extract_links(html: &str, page_url: &str) -> IndexSet<String> {
    extract_hrefs(html)
        .iter()
        .filter_map(|href| normalize_url(href, page_url))
        .filter(|link| is_same_domain(link, page_url))
        .collect()
}
