// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the core can raise on its own. Failures raised
// by caller-supplied collaborators (the step function and the
// corruption function) are NOT wrapped here: they travel back
// to the caller in the caller's own error type.
//
//   InvalidLatentShape / InvalidConfig → configuration errors
//   ShapeMismatch / ContractViolation  → call-time contract violations
//                                        (ShapeMismatch when the broken
//                                        contract is about shapes)
//   IndexOutOfRange                    → flat dataset index errors
//   EmptyDataset / MissingItem         → base collection problems

use thiserror::Error;

use crate::domain::shape::LatentShape;

/// Result type for walk-back and stochastic layer operations.
pub type WalkbackResult<T> = Result<T, WalkbackError>;

/// Errors raised by the core.
#[derive(Debug, Error)]
pub enum WalkbackError {
    /// Latent shape is not `(d,)`
    #[error("Invalid latent shape {shape}, must be (d,) where d is the dimension of each distribution")]
    InvalidLatentShape { shape: LatentShape },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shape mismatch. Also the call-time contract violation for
    /// arguments that must share a shape (`mu` / `logvar`, the KL pair).
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// Arguments that are inconsistent with each other
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Flat index outside `[0, len)`
    #[error("Index {index} out of range for walk-back dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Base collection has no samples
    #[error("Base collection is empty")]
    EmptyDataset,

    /// Base dataset returned nothing for an index below its length
    #[error("Base dataset returned no item at index {0}")]
    MissingItem(usize),
}

impl WalkbackError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a contract violation error
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }
}
