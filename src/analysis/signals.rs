//! On-page SEO signal extraction

use crate::url::authority;
use indexmap::IndexMap;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

/// Number of keywords kept per page
pub const TOP_KEYWORDS: usize = 20;

/// Placeholder recorded for an `<img>` without a `src`
pub const NO_SRC: &str = "No src attribute";

/// SEO signals extracted from one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSignals {
    pub url: String,
    /// Trimmed `<title>` text; `None` when the page has no title element
    pub title: Option<String>,
    /// Trimmed `content` of `<meta name="description">`
    pub meta_description: Option<String>,
    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    /// Most frequent words of three or more letters, with counts
    pub keywords: Vec<(String, u32)>,
    pub word_count: u32,
    /// Seconds from request to full body, rounded to 2 decimals
    pub load_time: f64,
    /// Whether a viewport meta tag is present
    pub mobile_friendly: bool,
    /// `src` of every image with a missing or empty `alt`
    pub images_without_alt: Vec<String>,
    pub internal_links: u32,
    pub external_links: u32,
    pub robots_txt_status: String,
    pub respect_robots: bool,
}

/// Extracts signals from an HTML body
///
/// `url` is the page address used for the internal/external link split;
/// `robots_txt_status` and `respect_robots` are carried through as given.
pub fn extract_signals(
    html: &str,
    url: &str,
    load_time: Duration,
    robots_txt_status: &str,
    respect_robots: bool,
) -> PageSignals {
    let document = Html::parse_document(html);
    let text = visible_text(&document);
    let host = authority(url).unwrap_or("");
    let hrefs = select_attrs(&document, "a[href]", "href");

    PageSignals {
        url: url.to_string(),
        title: first_text(&document, "title"),
        meta_description: select_attrs(&document, r#"meta[name="description"]"#, "content")
            .first()
            .map(|content| content.trim().to_string()),
        h1_tags: all_texts(&document, "h1"),
        h2_tags: all_texts(&document, "h2"),
        keywords: top_keywords(&text, TOP_KEYWORDS),
        word_count: count_words(&text),
        load_time: round_secs(load_time),
        mobile_friendly: has_match(&document, r#"meta[name="viewport"]"#),
        images_without_alt: images_without_alt(&document),
        internal_links: hrefs
            .iter()
            .filter(|href| href.starts_with('/') || (!host.is_empty() && href.contains(host)))
            .count() as u32,
        external_links: hrefs
            .iter()
            .filter(|href| href.starts_with("http") && (host.is_empty() || !href.contains(host)))
            .count() as u32,
        robots_txt_status: robots_txt_status.to_string(),
        respect_robots,
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css)?;
    document.select(&selector).next().map(element_text)
}

fn all_texts(document: &Html, css: &str) -> Vec<String> {
    match selector(css) {
        Some(selector) => document.select(&selector).map(element_text).collect(),
        None => Vec::new(),
    }
}

fn select_attrs(document: &Html, css: &str, attr: &str) -> Vec<String> {
    match selector(css) {
        Some(selector) => document
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn has_match(document: &Html, css: &str) -> bool {
    selector(css).map_or(false, |selector| document.select(&selector).next().is_some())
}

fn images_without_alt(document: &Html) -> Vec<String> {
    let Some(selector) = selector("img") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|img| img.value().attr("alt").map_or(true, str::is_empty))
        .map(|img| img.value().attr("src").unwrap_or(NO_SRC).to_string())
        .collect()
}

/// All text nodes outside `<script>` and `<style>`, joined with spaces
pub fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            parts.push(&**text);
        }
    }

    parts.join(" ")
}

/// Counts `\w+` tokens
pub fn count_words(text: &str) -> u32 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("word regex is valid"));
    re.find_iter(text).count() as u32
}

/// The `limit` most frequent lowercase words of at least three ASCII letters
///
/// Ties keep first-appearance order.
pub fn top_keywords(text: &str, limit: usize) -> Vec<(String, u32)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("keyword regex is valid"));

    let lower = text.to_lowercase();
    let mut counts: IndexMap<&str, u32> = IndexMap::new();
    for word in re.find_iter(&lower) {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>  Widgets | Example Shop  </title>
  <meta name="description" content=" Buy widgets online. ">
  <meta name="viewport" content="width=device-width">
  <style>.hidden { color: red; }</style>
  <script>var tracking = "analytics analytics analytics";</script>
</head>
<body>
  <h1> Quality widgets for everyone </h1>
  <h2>Blue widgets</h2>
  <h2>Red widgets</h2>
  <p>Widgets widgets everywhere. Buy a widget.</p>
  <img src="/logo.png" alt="Logo">
  <img src="/banner.png">
  <img alt="">
  <a href="/about">About</a>
  <a href="https://shop.example.com/cart">Cart</a>
  <a href="https://elsewhere.org/">Partner</a>
  <a href="mailto:hi@shop.example.com">Mail</a>
</body>
</html>"#;

    fn extract() -> PageSignals {
        extract_signals(
            PAGE,
            "https://shop.example.com/widgets",
            Duration::from_millis(1234),
            "Allowed by robots.txt",
            true,
        )
    }

    #[test]
    fn test_text_signals() {
        let signals = extract();
        assert_eq!(signals.title.as_deref(), Some("Widgets | Example Shop"));
        assert_eq!(signals.meta_description.as_deref(), Some("Buy widgets online."));
        assert_eq!(signals.h1_tags, vec!["Quality widgets for everyone"]);
        assert_eq!(signals.h2_tags, vec!["Blue widgets", "Red widgets"]);
        assert!(signals.mobile_friendly);
        assert_eq!(signals.load_time, 1.23);
        assert_eq!(signals.robots_txt_status, "Allowed by robots.txt");
    }

    #[test]
    fn test_keywords_skip_script_and_style() {
        let signals = extract();
        assert_eq!(signals.keywords[0], ("widgets".to_string(), 6));
        assert!(signals.keywords.iter().all(|(word, _)| word != "analytics"));
        assert!(signals.keywords.iter().all(|(word, _)| word != "hidden"));
        assert!(signals.keywords.iter().all(|(word, _)| word.len() >= 3));
    }

    #[test]
    fn test_images_and_links() {
        let signals = extract();
        assert_eq!(signals.images_without_alt, vec!["/banner.png", NO_SRC]);
        // "/about", the cart link and the mailto containing the host
        assert_eq!(signals.internal_links, 3);
        assert_eq!(signals.external_links, 1);
    }

    #[test]
    fn test_missing_elements() {
        let signals = extract_signals(
            "<html><body><p>Hi</p></body></html>",
            "https://example.com/",
            Duration::ZERO,
            "Robots.txt checking disabled",
            false,
        );
        assert_eq!(signals.title, None);
        assert_eq!(signals.meta_description, None);
        assert!(signals.h1_tags.is_empty());
        assert!(!signals.mobile_friendly);
        assert_eq!(signals.word_count, 1);
        assert!(!signals.respect_robots);
    }

    #[test]
    fn test_top_keywords_ties_and_limit() {
        let ranked = top_keywords("beta alpha beta gamma alpha delta on", 3);
        assert_eq!(
            ranked,
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("one two, three-four 5"), 5);
        assert_eq!(count_words(""), 0);
    }
}
