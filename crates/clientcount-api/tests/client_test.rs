#![allow(clippy::unwrap_used)]
// Integration tests for `ClientCountClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clientcount_api::{ClientCountClient, Error, Session};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ClientCountClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ClientCountClient::with_client(reqwest::Client::new(), base_url).unwrap();
    (server, client)
}

fn record(id: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "kawasan": "gatsu",
        "session": "pagi",
        "dhcp": 10,
        "dynamic": 20,
        "hotspot": 30,
        "guest": 40,
        "createdAt": created_at
    })
}

// ── Success paths ───────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_client_counts() {
    let (server, client) = setup().await;

    let body = json!({
        "status": "ok",
        "data": { "clientCount": [
            record("a", "2024-01-01T00:00:00Z"),
            record("b", "2024-01-02T00:00:00Z")
        ] }
    });

    Mock::given(method("GET"))
        .and(path("/client-count/gatsu/pagi"))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let records = client.client_counts("gatsu", Session::Morning).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "a");
    assert_eq!(records[1].guest, 40);
}

#[tokio::test]
async fn test_missing_client_count_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/client-count/ancol/siang"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "data": {} })),
        )
        .mount(&server)
        .await;

    let records = client.client_counts("ancol", Session::Afternoon).await.unwrap();
    assert!(records.is_empty());
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client.client_counts("gatsu", Session::Morning).await;

    match result {
        Err(Error::Http { status }) => assert_eq!(status, 502),
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.client_counts("gatsu", Session::Morning).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    // Grab a free port, then release it so nothing listens there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = ClientCountClient::with_client(reqwest::Client::new(), base).unwrap();

    let result = client.client_counts("gatsu", Session::Morning).await;

    match result {
        Err(ref err @ Error::Transport(_)) => assert!(err.status().is_none()),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}
