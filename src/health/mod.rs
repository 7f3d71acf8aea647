//! Health monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! periodic timer
//!     → prober.rs issues GET <base_url>/health over the network
//!     → 2xx = healthy, anything else = unhealthy
//!     → classification goes to the operational log only
//! ```
//!
//! # Design Decisions
//! - Purely observational: no audit rows, no restarts, no circuit breaking
//! - The probe path is the same one external monitors use

pub mod prober;

pub use prober::HealthProber;
