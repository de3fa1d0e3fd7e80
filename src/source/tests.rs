//! Tests for the Supabase transfer source

use super::*;
use crate::Error;
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> SupabaseSource {
    SupabaseSource::new(SupabaseConfig::new(server.uri(), "service-key")).unwrap()
}

fn cursor() -> Cursor {
    Utc.with_ymd_and_hms(2025, 2, 20, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_fetch_since_builds_postgrest_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .and(query_param("select", "*"))
        .and(query_param("created_at", "gte.2025-02-20T12:00:00Z"))
        .and(query_param("order", "created_at.asc"))
        .and(query_param("limit", "10"))
        .and(header("apikey", "service-key"))
        .and(header("Authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "tx_hash": "0x01",
                "from_addr": "0xaaa",
                "to_addr": "0xbbb",
                "block_number": 10,
                "amount": "5",
                "created_at": "2025-02-20T12:00:01+00:00"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = source_for(&mock_server)
        .fetch_since(cursor(), 10)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tx_hash, "0x01");
    assert_eq!(records[0].block_number, 10);
}

#[tokio::test]
async fn test_fetch_since_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let records = source_for(&mock_server)
        .fetch_since(cursor(), 10)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_since_orders_ascending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tx_hash": "late", "created_at": "2025-02-20T12:00:09Z"},
            {"tx_hash": "early", "created_at": "2025-02-20T12:00:01Z"}
        ])))
        .mount(&mock_server)
        .await;

    let records = source_for(&mock_server)
        .fetch_since(cursor(), 10)
        .await
        .unwrap();
    let hashes: Vec<_> = records.iter().map(|r| r.tx_hash.as_str()).collect();
    assert_eq!(hashes, vec!["early", "late"]);
}

#[tokio::test]
async fn test_fetch_since_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server)
        .fetch_since(cursor(), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_fetch_since_transport_error_is_unavailable() {
    let source = SupabaseSource::new(
        SupabaseConfig::new("http://127.0.0.1:1", "k").timeout(std::time::Duration::from_secs(2)),
    )
    .unwrap();

    let err = source.fetch_since(cursor(), 10).await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[tokio::test]
async fn test_fetch_since_bad_shape_is_unexpected_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "oops"})))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server)
        .fetch_since(cursor(), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedData { .. }));
}

#[tokio::test]
async fn test_fetch_since_skips_undecodable_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tx_hash": "0xgood", "block_number": 7, "created_at": "2025-02-20T12:00:01Z"},
            {"tx_hash": "0xnotime", "block_number": 8, "created_at": null},
            {"tx_hash": "0xbadblock", "block_number": "eight", "created_at": "2025-02-20T12:00:02Z"},
            {"tx_hash": "0xlater", "block_number": 9, "created_at": "2025-02-20T12:00:03Z"}
        ])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server);
    for _ in 0..2 {
        let records = source.fetch_since(cursor(), 10).await.unwrap();
        let hashes: Vec<_> = records.iter().map(|r| r.tx_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xgood", "0xlater"]);
    }
}

#[tokio::test]
async fn test_custom_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/large_transfers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = SupabaseSource::new(
        SupabaseConfig::new(mock_server.uri(), "k").table("large_transfers"),
    )
    .unwrap();
    source.fetch_since(cursor(), 5).await.unwrap();
}

#[test]
fn test_invalid_url_rejected() {
    let result = SupabaseSource::new(SupabaseConfig::new("not a url", "k"));
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_config_debug_hides_key() {
    let config = SupabaseConfig::new("https://x.supabase.co", "super-secret");
    assert!(!format!("{config:?}").contains("super-secret"));
}
