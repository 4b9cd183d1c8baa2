//! Per-run robots.txt cache
//!
//! One policy per origin (`scheme://host[:port]`), fetched lazily on first
//! use and never refreshed for the lifetime of the cache. A cache belongs to
//! a single crawl run.

use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::origin;
use reqwest::Client;
use std::collections::HashMap;

/// Reason reported when robots checking is turned off for the run
pub const REASON_DISABLED: &str = "Robots.txt checking disabled";
/// Reason reported when the policy permits the URL
pub const REASON_ALLOWED: &str = "Allowed by robots.txt";
/// Reason reported when the policy forbids the URL
pub const REASON_BLOCKED: &str = "Blocked by robots.txt";

/// A robots.txt policy as cached for one origin
#[derive(Debug, Clone)]
pub struct CachedPolicy {
    /// The parsed policy (allow-all when the fetch did not yield a file)
    pub robots: ParsedRobots,

    /// Why the policy is an allow-all fallback, if it is one
    pub fallback_reason: Option<String>,
}

impl CachedPolicy {
    /// Wraps a successfully fetched robots.txt
    pub fn parsed(robots: ParsedRobots) -> Self {
        Self {
            robots,
            fallback_reason: None,
        }
    }

    /// An allow-all policy recorded with the reason it was substituted
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            robots: ParsedRobots::allow_all(),
            fallback_reason: Some(reason.into()),
        }
    }
}

/// Outcome of a robots check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    pub reason: String,
}

impl RobotsVerdict {
    fn new(allowed: bool, reason: impl Into<String>) -> Self {
        Self {
            allowed,
            reason: reason.into(),
        }
    }
}

/// Lazily populated robots.txt cache for a single run
///
/// `enabled` only affects verdicts. Policies are still fetched on request
/// through [`RobotsCache::policy`] so sitemap discovery can read `Sitemap:`
/// lines when robots checking is off.
#[derive(Debug)]
pub struct RobotsCache {
    client: Client,
    enabled: bool,
    policies: HashMap<String, CachedPolicy>,
    fetches: usize,
}

impl RobotsCache {
    /// Creates an empty cache
    pub fn new(client: Client, enabled: bool) -> Self {
        Self {
            client,
            enabled,
            policies: HashMap::new(),
            fetches: 0,
        }
    }

    /// Whether verdicts consult robots.txt at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of robots.txt fetches performed so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Number of origins with a cached policy
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true if no policy has been cached yet
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Returns the policy for an origin, fetching robots.txt on first use
    ///
    /// Failed and non-200 fetches are cached too, as allow-all fallbacks.
    pub async fn policy(&mut self, origin: &str) -> &CachedPolicy {
        if !self.policies.contains_key(origin) {
            let policy = fetch_robots(&self.client, origin).await;
            self.fetches += 1;
            if let Some(reason) = &policy.fallback_reason {
                tracing::debug!("robots.txt for {} unavailable: {}", origin, reason);
            }
            self.policies.insert(origin.to_string(), policy);
        }
        &self.policies[origin]
    }

    /// Decides whether `url` may be fetched by `user_agent`
    pub async fn allowed(&mut self, url: &str, user_agent: &str) -> RobotsVerdict {
        if !self.enabled {
            return RobotsVerdict::new(true, REASON_DISABLED);
        }

        let Some(origin) = origin(url) else {
            return RobotsVerdict::new(true, format!("Could not read robots.txt: invalid URL {}", url));
        };

        let policy = self.policy(&origin).await;
        if let Some(reason) = &policy.fallback_reason {
            return RobotsVerdict::new(true, reason.clone());
        }

        if policy.robots.is_allowed(url, user_agent) {
            RobotsVerdict::new(true, REASON_ALLOWED)
        } else {
            tracing::debug!("{} blocked by robots.txt", url);
            RobotsVerdict::new(false, REASON_BLOCKED)
        }
    }
}
