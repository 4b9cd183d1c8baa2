//! Whole sessions: crawl, analyze, persist, export

use crate::common::{mount_page, test_config};
use seo_sweep::crawler::Coordinator;
use seo_sweep::output::{format_markdown_report, load_session, write_export, ExportFormat};
use seo_sweep::storage::{SessionStatus, SqliteStorage, Storage};
use seo_sweep::CrawlRequest;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME: &str = r#"<html><head>
<title>Handmade Widgets for Every Home | Example</title>
<meta name="description" content="Short description">
<meta name="viewport" content="width=device-width">
</head><body>
<h1>Handmade widgets built to last</h1>
<h2>Materials</h2>
<img src="/logo.png">
<a href="/about">About</a>
<a href="/private/admin">Admin</a>
<a href="https://other.com/">Partner</a>
</body></html>"#;

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>admin</p>"))
        .expect(0)
        .mount(server)
        .await;
    mount_page(server, "/", HOME).await;
    mount_page(server, "/about", "<html><head><title>About</title></head><body></body></html>").await;
}

fn open(dir: &Path) -> SqliteStorage {
    SqliteStorage::open(&dir.join("sweep.db")).unwrap()
}

#[tokio::test]
async fn test_session_persisted() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = format!("{}/", server.uri());

    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = Coordinator::new(test_config(dir.path()), "cafe", open(dir.path())).unwrap();
    let request = CrawlRequest::new(&base, 10, 2, true).unwrap();
    let outcome = coordinator.run(&request).await.unwrap();
    drop(coordinator);

    assert_eq!(outcome.urls_found, 3);
    assert_eq!(outcome.urls_analyzed, 2);

    // Reopen from disk
    let storage = open(dir.path());
    let session = storage.get_session(outcome.session_id).unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.base_url, base);
    assert_eq!(session.total_urls_found, 3);
    assert_eq!(session.total_urls_analyzed, 2);
    assert_eq!(session.issues_found, outcome.issues_found);
    assert!(session.completed_at.is_some());

    let results = storage.get_results(outcome.session_id).unwrap();
    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            base.clone(),
            format!("{}/about", server.uri()),
            format!("{}/private/admin", server.uri()),
        ]
    );

    let home = results[0].signals.as_ref().unwrap();
    assert_eq!(home.h1_tags.len(), 1);
    assert!(home.mobile_friendly);
    assert_eq!(home.images_without_alt, vec!["/logo.png"]);
    assert_eq!(home.external_links, 1);
    assert!(results[0]
        .issues
        .iter()
        .any(|issue| issue.starts_with("Meta description too short")));

    let denied = &results[2];
    assert!(denied.is_failure());
    assert!(denied.issues[0].starts_with("Analysis failed: Access denied by robots.txt"));

    // Issues of failed analyses are stored but not counted
    let counted: usize = results.iter().filter(|r| !r.is_failure()).map(|r| r.issue_count()).sum();
    assert_eq!(outcome.issues_found as usize, counted);
}

#[tokio::test]
async fn test_sessions_listed_newest_first() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>").await;
    let base = format!("{}/", server.uri());

    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = Coordinator::new(test_config(dir.path()), "cafe", open(dir.path())).unwrap();
    let request = CrawlRequest::new(&base, 5, 1, false).unwrap();
    let first = coordinator.run(&request).await.unwrap();
    let second = coordinator.run(&request).await.unwrap();

    let storage = coordinator.into_storage();
    let sessions = storage.list_sessions().unwrap();
    assert_eq!(storage.count_sessions().unwrap(), 2);
    assert_eq!(sessions[0].id, second.session_id);
    assert_eq!(sessions[1].id, first.session_id);
    assert!(sessions.iter().all(|s| !s.respect_robots));
}

#[tokio::test]
async fn test_export_and_report() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = format!("{}/", server.uri());

    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = Coordinator::new(test_config(dir.path()), "cafe", open(dir.path())).unwrap();
    let request = CrawlRequest::new(&base, 10, 2, true).unwrap();
    let outcome = coordinator.run(&request).await.unwrap();

    let storage = coordinator.into_storage();
    let (session, results) = load_session(&storage, outcome.session_id).unwrap();

    let csv_path = dir.path().join("out.csv");
    write_export(&results, ExportFormat::Csv, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("url,title,meta_description,h1_count"));

    let json_path = dir.path().join("out.json");
    write_export(&results, ExportFormat::Json, &json_path).unwrap();
    let rows: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 3);

    let report = format_markdown_report(&session, &results);
    assert!(report.contains(&format!("# SEO Sweep Report: {}", base)));
    assert!(report.contains("## Issues by Severity"));
    assert!(report.contains(&format!("### {}/about", server.uri())));
}
