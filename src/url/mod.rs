//! URL handling module for SEO Sweep
//!
//! This module provides the shallow canonicalization used to deduplicate
//! URLs during a crawl, plus authority/origin helpers for same-domain checks
//! and robots.txt lookups.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{authority, has_scheme_prefix, is_same_domain, origin, split_url, UrlParts};
pub use normalize::normalize_url;
