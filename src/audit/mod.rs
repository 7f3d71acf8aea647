//! Request audit subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → http::middleware::audit opens a RequestContext (context.rs)
//!     → handler executes
//!     → AuditRecord assembled (normalize.rs flattens the payload)
//!     → writer.rs appends to today's partition, header on first write
//!
//! at startup:
//!     retention.rs deletes partitions past the retention horizon
//! ```
//!
//! # Design Decisions
//! - One partition per calendar day, append-only, never rewritten
//! - A failed audit write is logged and swallowed; the response wins
//! - Row order is write-completion order, not request-start order

pub mod context;
pub mod normalize;
pub mod record;
pub mod retention;
pub mod writer;

pub use context::RequestContext;
pub use record::AuditRecord;
pub use writer::{AuditError, AuditLogWriter};
