//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: CORS_ALLOWED_ORIGINS, HEALTH_CHECK_URL, ...)
//!     → validation.rs (semantic checks)
//!     → ApiConfig (validated, immutable)
//!     → shared with server, prober and sweeper at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so the service runs with no file at all
//! - Environment variables win over the file, matching how the service
//!   is configured in container deployments

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ApiConfig;

use std::env;
use std::path::Path;

/// Load the configuration for this process.
///
/// Reads the TOML file named by `CONFIG_PATH` when set, otherwise starts
/// from defaults; environment overrides apply in both cases.
pub fn load() -> Result<ApiConfig, ConfigError> {
    match env::var("CONFIG_PATH") {
        Ok(path) => loader::load_config(Path::new(&path)),
        Err(_) => loader::load_from_env(),
    }
}
