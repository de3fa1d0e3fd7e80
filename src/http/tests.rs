//! Tests for the HTTP client module

use super::client::redact;
use super::*;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(!config.accept_invalid_certs);
    assert!(config.user_agent.starts_with("transfer-alerts/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .header("apikey", "secret")
        .accept_invalid_certs(true)
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(
        config.default_headers.get("apikey"),
        Some(&"secret".to_string())
    );
    assert!(config.accept_invalid_certs);
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("select", "*")
        .query("limit", "10")
        .json(serde_json::json!({"key": "value"}));

    assert_eq!(
        config.query,
        vec![
            ("select".to_string(), "*".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
    assert_eq!(config.body, Some(serde_json::json!({"key": "value"})));
}

#[tokio::test]
async fn test_http_client_get_with_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .and(query_param("limit", "10"))
        .and(header("apikey", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("apikey", "k")
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client
        .get_with_config("/rest/v1/transfers", RequestConfig::new().query("limit", "10"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_post_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_json(serde_json::json!({"chat_id": "42"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .post("/send", serde_json::json!({"chat_id": "42"}))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_returns_error_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "ok": false,
            "parameters": {"retry_after": 5}
        })))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .build();
    let client = HttpClient::with_config(config).unwrap();

    // Status interpretation belongs to the caller
    let response = client
        .post("/limited", serde_json::json!({}))
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
}

#[tokio::test]
async fn test_http_client_connection_refused() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let result = client.post("/x", serde_json::json!({})).await;
    assert!(matches!(result, Err(crate::Error::Http(_))));
}

#[test]
fn test_build_url() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(
        client.build_url("/rest/v1/transfers"),
        "https://api.example.com/rest/v1/transfers"
    );
    assert_eq!(
        client.build_url("https://other.example.com/x"),
        "https://other.example.com/x"
    );
}

#[test]
fn test_redact_bot_token() {
    assert_eq!(
        redact("https://api.telegram.org/bot123:ABC/sendMessage"),
        "https://api.telegram.org/bot<redacted>/sendMessage"
    );
    assert_eq!(
        redact("https://x.supabase.co/rest/v1/transfers"),
        "https://x.supabase.co/rest/v1/transfers"
    );
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("HttpClient"));
    assert!(debug.contains("accept_invalid_certs"));
}
