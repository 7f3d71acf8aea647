//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum setup: trace, CORS, timeout layers)
//!     → middleware/audit.rs (correlation ID, timing, audit record)
//!     → handlers.rs (banner, health check, scoring)
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
