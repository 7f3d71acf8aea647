//! End-to-end tests for the prediction endpoints and their audit trail.

mod common;

use std::path::Path;
use std::sync::Arc;

use prediction_api::audit::writer::partition_file_name;
use prediction_api::config::ApiConfig;
use prediction_api::lifecycle::Shutdown;

use common::{sample_request, start_server, BrokenModel, FixedModel};

fn test_config(log_dir: &Path) -> ApiConfig {
    let mut config = ApiConfig::default();
    config.audit.log_dir = log_dir.to_string_lossy().into_owned();
    config.health_probe.enabled = false;
    config
}

async fn read_today_partition(dir: &Path) -> Option<String> {
    let path = dir.join(partition_file_name(chrono::Local::now().date_naive()));
    tokio::fs::read_to_string(path).await.ok()
}

#[tokio::test]
async fn test_predict_success_returns_payload_and_audits_once() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let model = Arc::new(FixedModel {
        class: 3,
        probabilities: vec![0.1, 0.05, 0.85],
    });
    let addr = start_server(test_config(dir.path()), model, &shutdown).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/predict"))
        .json(&sample_request())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["prediction"], 3);
    assert!((body["probability"].as_f64().unwrap() - 0.85).abs() < 1e-9);
    assert_eq!(body["features_used"], 727);
    assert!(body["response_time_ms"].as_f64().unwrap() >= 0.0);
    let request_id = body["request_id"].as_str().unwrap();
    assert_eq!(request_id.len(), 36);

    // Exactly one data row behind the header, carrying the same
    // correlation identifier the client saw.
    let content = read_today_partition(dir.path()).await.expect("partition written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp,request_id,endpoint,method,"));
    assert!(lines[1].contains(request_id));
    assert!(lines[1].contains("/predict"));
    assert!(lines[1].contains(",200,"));
    assert!(lines[1].contains(",727,"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_scoring_error_returns_detail_and_audits_failure() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let addr = start_server(test_config(dir.path()), Arc::new(BrokenModel), &shutdown).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/predict"))
        .json(&sample_request())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("synthetic failure"));

    let content = read_today_partition(dir.path()).await.expect("partition written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",400,"));
    assert!(lines[1].contains("synthetic failure"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_body_still_yields_exactly_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let model = Arc::new(FixedModel {
        class: 0,
        probabilities: vec![1.0],
    });
    let addr = start_server(test_config(dir.path()), model, &shutdown).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/predict"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
    let status = res.status().as_u16();

    let content = read_today_partition(dir.path()).await.expect("partition written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(&format!(",{status},")));

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_reports_ok_with_working_model() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let model = Arc::new(FixedModel {
        class: 2,
        probabilities: vec![0.2, 0.3, 0.5],
    });
    let addr = start_server(test_config(dir.path()), model, &shutdown).await;

    let res = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "fixed-test-model");
    assert_eq!(body["prediction"], 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_reports_error_detail_without_failing_transport() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let addr = start_server(test_config(dir.path()), Arc::new(BrokenModel), &shutdown).await;

    let res = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["detail"].as_str().unwrap().contains("synthetic failure"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_audit_failure_never_fails_the_request() {
    // Point the log directory at a plain file so every append fails.
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();

    let shutdown = Shutdown::new();
    let model = Arc::new(FixedModel {
        class: 1,
        probabilities: vec![0.4, 0.6],
    });
    let addr = start_server(test_config(&blocked), model, &shutdown).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/predict"))
        .json(&sample_request())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["prediction"], 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_banner_and_unknown_routes_are_audited_generically() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let model = Arc::new(FixedModel {
        class: 0,
        probabilities: vec![1.0],
    });
    let addr = start_server(test_config(dir.path()), model, &shutdown).await;

    let res = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(res.status(), 200);
    let res = reqwest::get(format!("http://{addr}/nope")).await.unwrap();
    assert_eq!(res.status(), 404);

    let content = read_today_partition(dir.path()).await.expect("partition written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(",GET,"));
    assert!(lines[2].contains(",404,"));
    assert!(lines[2].contains("Not Found"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_cors_allows_the_configured_origin() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let mut config = test_config(dir.path());
    config.cors.allowed_origins = vec!["http://dashboard.example.com".to_string()];
    let model = Arc::new(FixedModel {
        class: 0,
        probabilities: vec![1.0],
    });
    let addr = start_server(config, model, &shutdown).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/"))
        .header("origin", "http://dashboard.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://dashboard.example.com")
    );

    shutdown.trigger();
}
