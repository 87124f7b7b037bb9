//! Remote store tests against a mock contents API

use std::collections::HashSet;
use std::time::Duration;

use honeypot_insights::{GithubLogStore, LogStore, StoreConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/repos/acme/honeypot-logs/contents/fortipot";

fn store_for(server: &MockServer) -> GithubLogStore {
    let config = StoreConfig::new("acme", "honeypot-logs")
        .with_base_url(server.uri())
        .with_timeout_ms(2_000);
    GithubLogStore::new(config).expect("valid store config")
}

#[tokio::test]
async fn test_listing_returns_file_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "2026-02-17_fortipot.log", "type": "file" },
            { "name": "archive", "type": "dir" },
            { "name": "2026-02-18_fortipot.log", "type": "file" }
        ])))
        .mount(&server)
        .await;

    let names = store_for(&server).list_files("fortipot").await.unwrap();
    assert_eq!(names, vec!["2026-02-17_fortipot.log", "2026-02-18_fortipot.log"]);
}

#[tokio::test]
async fn test_listing_failure_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = store_for(&server).list_files("fortipot").await.unwrap_err();
    assert_eq!(err.error_code(), "LISTING_ERROR");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn test_listing_that_is_not_an_array_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "This is a file" })))
        .mount(&server)
        .await;

    let err = store_for(&server).list_files("fortipot").await.unwrap_err();
    assert_eq!(err.error_code(), "DECODE_ERROR");
}

#[tokio::test]
async fn test_content_is_requested_raw_and_uncached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/2026-02-18_fortipot.log")))
        .and(header("accept", "application/vnd.github.v3.raw"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2026-02-18T00:00:00|INFO|1.2.3.4|GET /\n"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    for _ in 0..2 {
        let body = store.fetch_content("fortipot", "2026-02-18_fortipot.log").await;
        assert_eq!(body, "2026-02-18T00:00:00|INFO|1.2.3.4|GET /\n");
    }

    let requests = server.received_requests().await.expect("recording enabled");
    let tokens: Vec<String> = requests
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "_")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(requests.len(), 2);
    assert_eq!(tokens.len(), 2);
    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn test_every_request_is_cache_busted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    for _ in 0..3 {
        store.list_files("fortipot").await.unwrap();
    }

    let requests = server.received_requests().await.expect("recording enabled");
    let tokens: HashSet<String> = requests
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "_")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(requests.len(), 3);
    assert_eq!(tokens.len(), 3);
}

#[tokio::test]
async fn test_ref_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("ref", "logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "2026-02-18_a.log" }])))
        .mount(&server)
        .await;

    let config = StoreConfig::new("acme", "honeypot-logs")
        .with_base_url(server.uri())
        .with_ref("logs");
    let store = GithubLogStore::new(config).unwrap();
    assert_eq!(store.list_files("fortipot").await.unwrap(), vec!["2026-02-18_a.log"]);
}

#[tokio::test]
async fn test_failed_content_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/2026-02-18_fortipot.log")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_eq!(store.fetch_content("fortipot", "2026-02-18_fortipot.log").await, "");
    assert!(store
        .try_fetch_content("fortipot", "2026-02-18_fortipot.log")
        .await
        .is_err());
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&server)
        .await;

    let config = StoreConfig::new("acme", "honeypot-logs")
        .with_base_url(server.uri())
        .with_timeout_ms(200);
    let store = GithubLogStore::new(config).unwrap();

    assert_eq!(store.fetch_content("fortipot", "2026-02-18_a.log").await, "");
    let err = store.list_files("fortipot").await.unwrap_err();
    assert_eq!(err.error_code(), "NETWORK_ERROR");
}
