//! Integration tests for SEO Sweep
//!
//! These tests use wiremock to create mock HTTP servers and run crawls,
//! sitemap discovery and whole sessions end-to-end.

mod common;
mod crawl_tests;
mod robots_tests;
mod session_tests;
mod sitemap_tests;
