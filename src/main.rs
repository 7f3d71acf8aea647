//! Covid-19 Case Prediction API
//!
//! An HTTP service that loads a pre-trained classifier and answers
//! synchronous scoring requests, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                PREDICTION API                 │
//!                        │                                               │
//!     Client Request     │  ┌─────────┐    ┌────────────┐   ┌────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ middleware │──▶│handlers│  │
//!                        │  │ server  │    │   audit    │   │ score  │  │
//!                        │  └─────────┘    └─────┬──────┘   └───┬────┘  │
//!                        │                       │              │       │
//!                        │                       ▼              ▼       │
//!                        │                 ┌──────────┐   ┌──────────┐  │
//!     Client Response    │                 │  audit   │   │  model   │  │
//!     ◀──────────────────┼─────────────────│  writer  │   │ (oracle) │  │
//!                        │                 └──────────┘   └──────────┘  │
//!                        │                                               │
//!                        │  ┌─────────────────────────────────────────┐ │
//!                        │  │          Cross-Cutting Concerns          │ │
//!                        │  │  ┌────────┐ ┌─────────┐ ┌────────────┐  │ │
//!                        │  │  │ config │ │ health  │ │ retention  │  │ │
//!                        │  │  │        │ │ prober  │ │  sweeper   │  │ │
//!                        │  │  └────────┘ └─────────┘ └────────────┘  │ │
//!                        │  └─────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prediction_api::audit::retention;
use prediction_api::config;
use prediction_api::health::HealthProber;
use prediction_api::http::HttpServer;
use prediction_api::lifecycle::Shutdown;
use prediction_api::model::{ForestModel, ScoringModel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prediction_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("prediction-api v0.1.0 starting");

    let config = config::load()?;

    tracing::info!(
        bind_address = %config.server.bind_address,
        log_dir = %config.audit.log_dir,
        retention_days = config.audit.retention_days,
        "Configuration loaded"
    );

    // The model is loaded once and injected; nothing references it as
    // ambient state.
    let model: Arc<dyn ScoringModel> = Arc::new(ForestModel::load(&config.model.path)?);
    tracing::info!(model = %model.name(), "Model loaded");

    // Expired partitions are cleared before traffic is accepted.
    let outcome = retention::sweep(
        Path::new(&config.audit.log_dir),
        chrono::Local::now().date_naive(),
        config.audit.retention_days,
    );
    tracing::info!(
        scanned = outcome.scanned,
        deleted = outcome.deleted,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "Retention sweep complete"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    // Spawn the self health probe
    let prober = HealthProber::from_config(&config);
    let prober_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        prober.run(prober_shutdown).await;
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    // Create and run HTTP server
    let server = HttpServer::new(&config, model);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
