//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check CORS origins parse as header values before the router is built
//! - Validate value ranges (retention and probe interval must be positive)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;

use crate::config::schema::ApiConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyBindAddress,
    InvalidOrigin(String),
    NonPositiveRetention(i64),
    ZeroProbeInterval,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBindAddress => write!(f, "server.bind_address is empty"),
            ValidationError::InvalidOrigin(origin) => {
                write!(f, "cors origin {:?} is not a valid header value", origin)
            }
            ValidationError::NonPositiveRetention(days) => {
                write!(f, "audit.retention_days must be positive, got {}", days)
            }
            ValidationError::ZeroProbeInterval => {
                write!(f, "health_probe.interval_secs must be positive when enabled")
            }
        }
    }
}

/// Check everything serde cannot.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }
    if config.audit.retention_days <= 0 {
        errors.push(ValidationError::NonPositiveRetention(
            config.audit.retention_days,
        ));
    }
    if config.health_probe.enabled && config.health_probe.interval_secs == 0 {
        errors.push(ValidationError::ZeroProbeInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
