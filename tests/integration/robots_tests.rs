//! robots.txt behavior across a whole crawl

use crate::common::{mount_page, test_crawler};
use seo_sweep::CrawlRequest;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_robots_fetched_once_per_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/c">c</a>"#).await;
    mount_page(&server, "/b", "<p>b</p>").await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 3, true).unwrap();
    let state = test_crawler().run(&request).await;

    assert_eq!(state.crawled_count(), 4);
    assert_eq!(state.robots().fetch_count(), 1);
}

#[tokio::test]
async fn test_disallowed_page_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/private/page">p</a><a href="/public">p</a>"#).await;
    mount_page(&server, "/public", "<p>public</p>").await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/secret">s</a>"#))
        .expect(0)
        .mount(&server)
        .await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 3, true).unwrap();
    let urls = test_crawler().crawl_site(&request).await;

    // Still discovered, just never visited
    assert!(urls.contains(&format!("{}/private/page", base)));
    assert!(!urls.contains(&format!("{}/secret", base)));
}

#[tokio::test]
async fn test_disallow_ignored_when_robots_off() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", "<p>a</p>").await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 2, false).unwrap();
    let state = test_crawler().run(&request).await;
    assert_eq!(state.crawled_count(), 2);
}

#[tokio::test]
async fn test_robots_network_error_fails_open() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The redirect target refuses connections
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "http://127.0.0.1:9/robots.txt"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", "<p>a</p>").await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 2, true).unwrap();
    let state = test_crawler().run(&request).await;

    assert_eq!(state.crawled_count(), 2);
    assert_eq!(state.robots().fetch_count(), 1);
}

#[tokio::test]
async fn test_delay_follows_denied_and_failed_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/private/a">p</a><a href="/gone">g</a>"#).await;

    let delay = std::time::Duration::from_millis(200);
    let crawler = seo_sweep::SiteCrawler::new(reqwest::Client::new(), "TestBot")
        .with_politeness_delay(delay);
    let request = CrawlRequest::new(&format!("{}/", base), 50, 2, true).unwrap();

    let started = std::time::Instant::now();
    let state = crawler.run(&request).await;
    let elapsed = started.elapsed();

    // "/" fetched, "/private/a" denied, "/gone" answered 404
    assert_eq!(state.crawled_count(), 3);
    assert!(
        elapsed >= delay * 3,
        "3 URLs processed in {:?}, expected at least {:?}",
        elapsed,
        delay * 3
    );
}
