//! Integration tests for the plain HTTP fetcher against a local mock
//! server: success, non-2xx and unreachable-host paths, and the
//! browser-like User-Agent header.

use aviso_core::{HttpFetcher, MonitorConfig, PageFetcher};

fn fetcher_for(config: &MonitorConfig) -> HttpFetcher {
    HttpFetcher::new(config).expect("client should build")
}

#[tokio::test]
async fn returns_body_on_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/catedra/")
        .with_status(200)
        .with_body("<html><span>2024-01-01 10:00:00</span></html>")
        .create_async()
        .await;

    let config = MonitorConfig::default();
    let body = fetcher_for(&config)
        .fetch(&format!("{}/catedra/", server.url()))
        .await;

    assert_eq!(
        body.as_deref(),
        Some("<html><span>2024-01-01 10:00:00</span></html>")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn sends_browser_like_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/catedra/")
        .match_header("user-agent", mockito::Matcher::Regex("^Mozilla/5\\.0".into()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let config = MonitorConfig::default();
    fetcher_for(&config)
        .fetch(&format!("{}/catedra/", server.url()))
        .await;

    mock.assert_async().await;
}

#[tokio::test]
async fn non_2xx_status_yields_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/catedra/")
        .with_status(503)
        .create_async()
        .await;

    let config = MonitorConfig::default();
    let body = fetcher_for(&config)
        .fetch(&format!("{}/catedra/", server.url()))
        .await;

    assert_eq!(body, None);
}

#[tokio::test]
async fn unreachable_host_yields_none() {
    let config = MonitorConfig {
        http_timeout_seconds: 1,
        ..Default::default()
    };
    let body = fetcher_for(&config)
        .fetch("http://127.0.0.1:1/catedra/")
        .await;

    assert_eq!(body, None);
}
