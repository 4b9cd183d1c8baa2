//! End-to-end traversal tests

use crate::common::{mount_page, test_crawler};
use seo_sweep::CrawlRequest;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_same_domain_links_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<html><body>
            <a href="/about">About</a>
            <a href="{}/contact">Contact</a>
            <a href="https://other.com/x">Elsewhere</a>
            <a href="mailto:team@example.com">Mail</a>
            </body></html>"#,
            base
        ),
    )
    .await;

    let request = CrawlRequest::new(&format!("{}/", base), 10, 1, true).unwrap();
    let urls = test_crawler().crawl_site(&request).await;

    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/about", base),
            format!("{}/contact", base),
        ]
    );
    assert!(urls.iter().all(|url| !url.contains("other.com")));
}

#[tokio::test]
async fn test_max_urls_one_crawls_one_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/a">a</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>a</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let request = CrawlRequest::new(&format!("{}/", base), 1, 3, false).unwrap();
    let state = test_crawler().run(&request).await;

    assert_eq!(state.crawled_count(), 1);
    assert_eq!(state.results(request.max_urls() as usize), vec![format!("{}/", base)]);
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&server, "/level1", r#"<a href="/level2">2</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/level3">3</a>"#))
        .expect(0)
        .mount(&server)
        .await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 2, false).unwrap();
    let urls = test_crawler().crawl_site(&request).await;

    // level2 is discovered on a depth-2 page but never fetched
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/level1", base),
            format!("{}/level2", base),
        ]
    );
}

#[tokio::test]
async fn test_pages_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/">home</a><a href="/a">a</a><a href="/a#top">a</a>"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/">home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 5, false).unwrap();
    let urls = test_crawler().crawl_site(&request).await;
    assert_eq!(urls.len(), 2);
}

#[tokio::test]
async fn test_broken_pages_still_count_as_visited() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/broken">b</a><a href="/ok">ok</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", r#"<a href="/deeper">d</a>"#).await;

    let request = CrawlRequest::new(&format!("{}/", base), 50, 2, false).unwrap();
    let state = test_crawler().run(&request).await;

    assert!(state.is_crawled(&format!("{}/broken", base)));
    assert!(state.discovered().contains(&format!("{}/deeper", base)));
    assert_eq!(state.crawled_count(), 3);
}

#[tokio::test]
async fn test_invalid_base_url_rejected() {
    assert!(CrawlRequest::new("http://", 10, 2, true).is_err());
    assert!(CrawlRequest::new("ftp://example.com/", 10, 2, true).is_err());
    assert!(CrawlRequest::new("", 10, 2, true).is_err());
}
