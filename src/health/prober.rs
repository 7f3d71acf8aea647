//! Periodic self-probe of the serving path.
//!
//! The probe calls the externally reachable `/health` endpoint over the
//! network, which in turn exercises the model with a synthetic zero
//! vector. It runs on its own schedule, decoupled from request traffic;
//! a slow or failing probe never delays in-flight requests.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::ApiConfig;

pub struct HealthProber {
    url: String,
    interval: Duration,
    timeout: Duration,
    enabled: bool,
    client: reqwest::Client,
}

impl HealthProber {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            url: format!(
                "{}/health",
                config.probe_base_url().trim_end_matches('/')
            ),
            interval: Duration::from_secs(config.health_probe.interval_secs),
            timeout: Duration::from_secs(config.health_probe.timeout_secs),
            enabled: config.health_probe.enabled,
            client: reqwest::Client::new(),
        }
    }

    /// Run the probe loop until the shutdown channel fires.
    ///
    /// Cancellation is checked between ticks, so shutdown never leaves an
    /// orphaned recurring task behind.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            tracing::info!("Health probe disabled");
            return;
        }

        tracing::info!(
            url = %self.url,
            interval_secs = self.interval.as_secs(),
            "Health probe starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health probe received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Issue one probe and classify the result. Any 2xx response counts
    /// as healthy; everything else, transport errors included, does not.
    pub async fn probe(&self) -> bool {
        match self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url = %self.url, status = %response.status(), "Health probe ok");
                true
            }
            Ok(response) => {
                tracing::warn!(
                    url = %self.url,
                    status = %response.status(),
                    "Health probe failed: non-success status"
                );
                false
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Health probe failed: request error");
                false
            }
        }
    }
}
