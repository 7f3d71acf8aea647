//! Scoring boundary.
//!
//! # Data Flow
//! ```text
//! request payload
//!     → features.rs (fixed 727-slot vector: numerics + one-hot blocks)
//!     → ScoringModel::score (opaque oracle)
//!     → (predicted class, class probabilities)
//! ```
//!
//! # Design Decisions
//! - The model is injected once at startup as `Arc<dyn ScoringModel>`,
//!   never referenced as ambient state
//! - Artifact internals stay behind serde; callers see an opaque oracle

pub mod features;
pub mod forest;

pub use features::{CovidData, FEATURE_COUNT};
pub use forest::ForestModel;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("malformed model artifact: {0}")]
    Malformed(String),
    #[error("expected {expected} features, got {actual}")]
    FeatureLength { expected: usize, actual: usize },
    #[error("scoring failed: {0}")]
    Scoring(String),
}

/// Outcome of one scoring call.
#[derive(Debug, Clone)]
pub struct Scored {
    pub class: i64,
    /// Per-class probabilities, summing to 1.0 within floating-point
    /// tolerance.
    pub probabilities: Vec<f64>,
}

impl Scored {
    /// Confidence reported to callers: the highest class probability.
    pub fn confidence(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

/// The pre-trained classifier, consumed as an opaque oracle.
pub trait ScoringModel: Send + Sync {
    fn name(&self) -> &str;

    /// Score one feature vector.
    fn score(&self, features: &[f64]) -> Result<Scored, ModelError>;
}
