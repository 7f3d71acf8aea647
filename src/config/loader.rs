//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::ApiConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file, with environment
/// overrides applied on top.
pub fn load_config(path: &Path) -> Result<ApiConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ApiConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration without a file: defaults plus environment overrides.
pub fn load_from_env() -> Result<ApiConfig, ConfigError> {
    let mut config = ApiConfig::default();

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the environment surface onto `config`.
///
/// `CORS_ALLOWED_ORIGINS` is a comma-separated origin list;
/// `HEALTH_CHECK_URL` is the externally reachable base URL the probe
/// targets. The remaining variables mirror the config file sections.
pub fn apply_env_overrides(config: &mut ApiConfig) {
    if let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
    }
    if let Ok(url) = env::var("HEALTH_CHECK_URL") {
        config.health_probe.base_url = Some(url);
    }
    if let Ok(path) = env::var("MODEL_PATH") {
        config.model.path = path;
    }
    if let Ok(dir) = env::var("PREDICTION_LOG_DIR") {
        config.audit.log_dir = dir;
    }
    if let Ok(addr) = env::var("BIND_ADDRESS") {
        config.server.bind_address = addr;
    }
}
