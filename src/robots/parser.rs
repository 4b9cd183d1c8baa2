//! Robots.txt parser implementation
//!
//! Allow/disallow evaluation is delegated to the robotstxt crate (Google's
//! matcher). `Sitemap` lines, which that matcher ignores, are read here with
//! a small line scanner.

use robotstxt::DefaultMatcher;
use url::Url;

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher, providing a
/// simplified interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    /// Whether to allow everything regardless of content
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true if this policy permits everything unconditionally
    pub fn is_allow_all(&self) -> bool {
        self.allow_all
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// `url` should be absolute; the matcher extracts the path and query
    /// itself. Rules are written against the escaped form of a path, so
    /// the URL is percent-encoded before matching.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let encoded = Url::parse(url).map(String::from);
        let target = encoded.as_deref().unwrap_or(url);

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, target)
    }

    /// Returns every `Sitemap:` URL declared in the file, in order
    ///
    /// Sitemap directives are global, so group membership does not matter.
    pub fn sitemaps(&self) -> Vec<String> {
        directives(&self.content)
            .filter(|(key, value)| key == "sitemap" && !value.is_empty())
            .map(|(_, value)| value.to_string())
            .collect()
    }
}

/// Iterates `(lowercased key, trimmed value)` pairs, skipping comments and
/// lines without a colon
fn directives(content: &str) -> impl Iterator<Item = (String, &str)> {
    content.lines().filter_map(|line| {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        }
        .trim();
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim()))
    })
}
