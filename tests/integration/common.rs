//! Shared helpers for the integration tests

use seo_sweep::config::Config;
use seo_sweep::SiteCrawler;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `body` as HTML at `at`
pub async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Serves `body` as XML at `at`
pub async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

/// A crawler without politeness delay
pub fn test_crawler() -> SiteCrawler {
    SiteCrawler::new(reqwest::Client::new(), "TestBot").with_politeness_delay(Duration::ZERO)
}

/// A configuration writing to a database inside `dir`
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.politeness_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.database_path = dir.join("sweep.db").to_string_lossy().into_owned();
    config.output.export_dir = dir.to_string_lossy().into_owned();
    config
}

pub fn url_set(entries: &[&str]) -> String {
    let urls: String = entries
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        urls
    )
}

pub fn sitemap_index(entries: &[&str]) -> String {
    let maps: String = entries
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        maps
    )
}
