//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the prediction API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Cross-origin access settings.
    pub cors: CorsConfig,

    /// Model artifact settings.
    pub model: ModelConfig,

    /// Audit log settings.
    pub audit: AuditConfig,

    /// Self health probe settings.
    pub health_probe: HealthProbeConfig,
}

impl ApiConfig {
    /// Base URL the health probe targets.
    ///
    /// Falls back to localhost with the port of the bind address (or 8000
    /// when that cannot be determined) if no URL is configured.
    pub fn probe_base_url(&self) -> String {
        if let Some(url) = &self.health_probe.base_url {
            return url.clone();
        }
        let port = self
            .server
            .bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);
        format!("http://localhost:{port}")
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Cross-origin resource sharing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:4200".to_string()],
        }
    }
}

/// Model artifact configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the exported forest artifact (JSON).
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "model/random_forest.json".to_string(),
        }
    }
}

/// Audit log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Directory holding one CSV partition per calendar day.
    pub log_dir: String,

    /// Days a partition is kept before the sweeper deletes it.
    pub retention_days: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            retention_days: 30,
        }
    }
}

/// Self health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthProbeConfig {
    /// Enable the periodic probe.
    pub enabled: bool,

    /// Probe interval in seconds.
    pub interval_secs: u64,

    /// Timeout for a single probe request in seconds.
    pub timeout_secs: u64,

    /// Externally reachable base URL; derived from the bind address when
    /// unset.
    pub base_url: Option<String>,
}

impl Default for HealthProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 900,
            timeout_secs: 10,
            base_url: None,
        }
    }
}
