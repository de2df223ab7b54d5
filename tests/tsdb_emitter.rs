//! OpenTSDB client tests against a mock HTTP server

use chrono::DateTime;
use conn_check::{
    emitter::{DataPoint, MetricSink, TsdbClient},
    models::TsdbConfig,
    AppError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn point() -> DataPoint {
    let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    DataPoint::new("ping", 23.0, at)
        .with_tag("failed", "1")
        .with_tag("app", "wconn")
}

fn tsdb_config(url: String) -> TsdbConfig {
    TsdbConfig {
        url: Some(url),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_put_sends_json_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/put"))
        .and(body_json(json!([{
            "metric": "ping",
            "timestamp": 1_700_000_000,
            "value": 23.0,
            "tags": { "app": "wconn", "failed": "1" }
        }])))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = TsdbClient::new(&tsdb_config(server.uri())).unwrap();
    client.emit(&[point()]).await.unwrap();
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/put"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = TsdbConfig {
        username: Some("user".to_string()),
        password: Some("pass".to_string()),
        ..tsdb_config(server.uri())
    };
    let client = TsdbClient::new(&config).unwrap();
    client.emit(&[point()]).await.unwrap();
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/opentsdb/api/put"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = TsdbClient::new(&tsdb_config(format!("{}/opentsdb", server.uri()))).unwrap();
    client.emit(&[point()]).await.unwrap();
}

#[tokio::test]
async fn test_rejected_put_is_emission_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/put"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"error\":\"bad tag\"}"))
        .mount(&server)
        .await;

    let client = TsdbClient::new(&tsdb_config(server.uri())).unwrap();
    let err = client.emit(&[point()]).await.unwrap_err();

    assert!(matches!(err, AppError::MetricEmission(_)));
    assert!(err.to_string().contains("HTTP 400"));
    assert!(err.to_string().contains("bad tag"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = TsdbConfig {
        timeout_seconds: 1,
        ..tsdb_config(server.uri())
    };
    let client = TsdbClient::new(&config).unwrap();
    let err = client.emit(&[point()]).await.unwrap_err();

    assert_eq!(err.category(), "TIMEOUT");
}

#[tokio::test]
async fn test_unreachable_server_is_error() {
    // Nothing listens on the discard port locally
    let client = TsdbClient::new(&tsdb_config("http://127.0.0.1:9".to_string())).unwrap();
    assert!(client.emit(&[point()]).await.is_err());
}
