//! Sitemap seeding of whole crawls

use crate::common::{mount_page, mount_xml, sitemap_index, test_crawler, url_set};
use seo_sweep::CrawlRequest;
use wiremock::MockServer;

#[tokio::test]
async fn test_sitemap_index_seeds_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<p>no links</p>").await;
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[&format!("{}/sitemap-pages.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap-pages.xml",
        url_set(&[&format!("{}/p1", base), &format!("{}/p2", base)]),
    )
    .await;

    let request = CrawlRequest::new(&format!("{}/", base), 10, 1, false).unwrap();
    let urls = test_crawler().crawl_site(&request).await;

    assert_eq!(
        urls,
        vec![format!("{}/", base), format!("{}/p1", base), format!("{}/p2", base)]
    );
}

#[tokio::test]
async fn test_sitemap_urls_truncated_by_max_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<p>home</p>").await;
    let pages: Vec<String> = (1..=5).map(|i| format!("{}/p{}", base, i)).collect();
    let refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    mount_xml(&server, "/sitemap.xml", url_set(&refs)).await;

    let request = CrawlRequest::new(&format!("{}/", base), 3, 2, false).unwrap();
    let urls = test_crawler().crawl_site(&request).await;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], format!("{}/", base));
}

#[tokio::test]
async fn test_malformed_sitemap_falls_back_to_loc_scan() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<p>home</p>").await;
    mount_xml(
        &server,
        "/sitemap.xml",
        format!(
            "<urlset><url><loc>{b}/m1</loc></url><url><loc>\n  {b}/m2\n</loc>",
            b = base
        ),
    )
    .await;

    let request = CrawlRequest::new(&format!("{}/", base), 10, 1, false).unwrap();
    let urls = test_crawler().crawl_site(&request).await;

    assert!(urls.contains(&format!("{}/m1", base)));
    assert!(urls.contains(&format!("{}/m2", base)));
}

#[tokio::test]
async fn test_robots_declared_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<p>home</p>").await;
    mount_xml(
        &server,
        "/robots.txt",
        format!("User-agent: *\nAllow: /\nSitemap: {}/custom-map.xml\n", base),
    )
    .await;
    mount_xml(&server, "/custom-map.xml", url_set(&[&format!("{}/from-robots", base)])).await;

    let request = CrawlRequest::new(&format!("{}/", base), 10, 1, true).unwrap();
    let state = test_crawler().run(&request).await;

    assert!(state.discovered().contains(&format!("{}/from-robots", base)));
    // Discovery and traversal share one robots.txt fetch
    assert_eq!(state.robots().fetch_count(), 1);
}
