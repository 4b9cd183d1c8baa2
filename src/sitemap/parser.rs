//! Sitemap XML parsing
//!
//! Handles both `<sitemapindex>` and `<urlset>` documents. Elements are
//! matched by local name, so `<sm:loc>` and `<loc>` are the same thing.

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised by the strict sitemap parser
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SitemapError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Mismatched closing tag: expected </{expected}>, found </{found}>")]
    Mismatched { expected: String, found: String },

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Document has no root element")]
    NoRoot,
}

/// Locations declared by one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Child sitemaps (`<sitemap><loc>`), in document order
    pub sitemaps: Vec<String>,
    /// Page URLs (`<url><loc>`), in document order
    pub urls: Vec<String>,
}

impl SitemapDocument {
    pub fn is_empty(&self) -> bool {
        self.sitemaps.is_empty() && self.urls.is_empty()
    }
}

/// Parses a sitemap document strictly
///
/// Any XML error, a closing tag that does not match, an element left open at
/// the end of input, or a document without a root element is an error.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = SitemapDocument::default();
    let mut stack: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut loc_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "loc" {
                    loc_text.clear();
                }
                stack.push(name);
                saw_root = true;
            }
            Ok(Event::Empty(_)) => {
                saw_root = true;
            }
            Ok(Event::Text(e)) => {
                if stack.last().map(String::as_str) == Some("loc") {
                    let text = e.unescape().map_err(|e| SitemapError::Xml(e.to_string()))?;
                    loc_text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if stack.last().map(String::as_str) == Some("loc") {
                    loc_text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let Some(open) = stack.pop() else {
                    return Err(SitemapError::Xml(format!("unexpected </{}>", name)));
                };
                if open != name {
                    return Err(SitemapError::Mismatched {
                        expected: open,
                        found: name,
                    });
                }
                if name == "loc" {
                    let loc = loc_text.trim();
                    if !loc.is_empty() {
                        match stack.last().map(String::as_str) {
                            Some("sitemap") => doc.sitemaps.push(loc.to_string()),
                            Some("url") => doc.urls.push(loc.to_string()),
                            _ => {}
                        }
                    }
                    loc_text.clear();
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SitemapError::Xml(e.to_string())),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(SitemapError::Unclosed(open));
    }
    if !saw_root {
        return Err(SitemapError::NoRoot);
    }

    Ok(doc)
}

/// Extracts every `<loc>` span with a regular expression
///
/// Used on documents the strict parser rejects. Spans are reported as page
/// URLs since the surrounding structure cannot be trusted.
pub fn scan_locs(xml: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)<loc>\s*(.*?)\s*</loc>").expect("loc regex is valid"));

    re.captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|loc| !loc.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses strictly, falling back to [`scan_locs`] on failure
pub fn parse_sitemap_lenient(xml: &str) -> SitemapDocument {
    match parse_sitemap(xml) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Sitemap is not well-formed ({}), scanning for <loc> tags", e);
            SitemapDocument {
                sitemaps: Vec::new(),
                urls: scan_locs(xml),
            }
        }
    }
}
