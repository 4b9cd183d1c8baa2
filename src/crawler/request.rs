use crate::config::CrawlerConfig;
use crate::url::has_scheme_prefix;
use crate::ConfigError;
use url::Url;

/// Upper bound on the number of URLs a single crawl returns
pub const MAX_URLS_LIMIT: u32 = 200;

/// Upper bound on the number of BFS levels a single crawl processes
pub const MAX_DEPTH_LIMIT: u32 = 5;

/// Validated input to one crawl run
///
/// Fields are private so a request can only be built through
/// [`CrawlRequest::new`], which guarantees a usable http(s) base URL and
/// limits inside their bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    base_url: String,
    max_urls: u32,
    max_depth: u32,
    respect_robots: bool,
}

impl CrawlRequest {
    /// Builds a request, cleaning the URL and clamping the limits
    ///
    /// A bare host such as `example.com` gets an `https://` prefix. Limits
    /// are clamped into `1..=200` URLs and `1..=5` levels rather than
    /// rejected.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Validation` - the URL is empty
    /// * `ConfigError::InvalidUrl` - the URL does not parse, is not http(s),
    ///   or has no host
    ///
    /// # Example
    ///
    /// ```
    /// use seo_sweep::CrawlRequest;
    ///
    /// let request = CrawlRequest::new("example.com", 500, 0, true).unwrap();
    /// assert_eq!(request.base_url(), "https://example.com");
    /// assert_eq!(request.max_urls(), 200);
    /// assert_eq!(request.max_depth(), 1);
    /// ```
    pub fn new(
        base_url: &str,
        max_urls: u32,
        max_depth: u32,
        respect_robots: bool,
    ) -> Result<Self, ConfigError> {
        let base_url = clean_url(base_url)
            .ok_or_else(|| ConfigError::Validation("URL is required".to_string()))?;

        let parsed = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: only http and https are supported",
                base_url
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidUrl(format!("{}: missing host", base_url)));
        }

        Ok(Self {
            base_url,
            max_urls: max_urls.clamp(1, MAX_URLS_LIMIT),
            max_depth: max_depth.clamp(1, MAX_DEPTH_LIMIT),
            respect_robots,
        })
    }

    /// Builds a request with every unspecified option taken from configuration
    pub fn with_defaults(
        base_url: &str,
        max_urls: Option<u32>,
        max_depth: Option<u32>,
        respect_robots: Option<bool>,
        defaults: &CrawlerConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(
            base_url,
            max_urls.unwrap_or(defaults.default_max_urls),
            max_depth.unwrap_or(defaults.default_max_depth),
            respect_robots.unwrap_or(defaults.respect_robots),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_urls(&self) -> u32 {
        self.max_urls
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn respect_robots(&self) -> bool {
        self.respect_robots
    }
}

/// Trims a user-supplied URL and adds `https://` when no scheme is given
///
/// Returns `None` for blank input. A URL with another `scheme://` prefix is
/// kept as written, so [`CrawlRequest::new`] rejects it instead of crawling
/// a host named after the scheme.
pub fn clean_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if has_scheme_prefix(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}
