//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use prediction_api::config::ApiConfig;
use prediction_api::http::HttpServer;
use prediction_api::lifecycle::Shutdown;
use prediction_api::model::{ModelError, Scored, ScoringModel, FEATURE_COUNT};

/// Model returning a fixed class and distribution.
#[allow(dead_code)]
pub struct FixedModel {
    pub class: i64,
    pub probabilities: Vec<f64>,
}

impl ScoringModel for FixedModel {
    fn name(&self) -> &str {
        "fixed-test-model"
    }

    fn score(&self, features: &[f64]) -> Result<Scored, ModelError> {
        if features.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureLength {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }
        Ok(Scored {
            class: self.class,
            probabilities: self.probabilities.clone(),
        })
    }
}

/// Model that always fails, for error-path tests.
#[allow(dead_code)]
pub struct BrokenModel;

impl ScoringModel for BrokenModel {
    fn name(&self) -> &str {
        "broken-test-model"
    }

    fn score(&self, _features: &[f64]) -> Result<Scored, ModelError> {
        Err(ModelError::Scoring("synthetic failure".into()))
    }
}

/// Bind an ephemeral port, run the server on it and return its address.
#[allow(dead_code)]
pub async fn start_server(
    config: ApiConfig,
    model: Arc<dyn ScoringModel>,
    shutdown: &Shutdown,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(&config, model);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    addr
}

/// The scoring payload exercised throughout the integration tests.
#[allow(dead_code)]
pub fn sample_request() -> serde_json::Value {
    serde_json::json!({
        "confirmed_case": 100,
        "date": "2020-03-01",
        "deaths": 2,
        "recovered": 50,
        "location": "",
        "region": "",
        "country": "",
        "continent": "EUROPE",
        "population": 10000.0,
        "who_region": "Europe"
    })
}
