// ============================================================
// Layer 3 — LatentShape
// ============================================================
// A shape specification can be written as a single number
// (`10`) or as a sequence (`[10]`, `vec![2, 5]`). Every
// stochastic layer first normalises whatever it was given
// into one canonical form, then checks its rank.
//
// Example:
//   as_shape(10)        → (10,)
//   as_shape([2, 5])    → (2, 5)
//   as_shape(vec![])    → ()
//
// Reference: Rust Book §10 (Traits: From / Into)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{WalkbackError, WalkbackResult};

/// A canonical, tuple-like shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatentShape(Vec<usize>);

impl LatentShape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Product of all dimensions (1 for the empty shape).
    pub fn num_elements(&self) -> usize {
        self.0.iter().product()
    }

    /// Returns `d` for a shape `(d,)`.
    ///
    /// Every stochastic layer describes one distribution of
    /// dimension `d`, so anything that is not rank 1 (or is
    /// zero-sized) is a configuration error.
    pub fn vector_dim(&self) -> WalkbackResult<usize> {
        match self.0.as_slice() {
            [d] if *d > 0 => Ok(*d),
            _ => Err(WalkbackError::InvalidLatentShape { shape: self.clone() }),
        }
    }
}

/// Normalise a scalar or a sequence into a `LatentShape`.
pub fn as_shape(spec: impl Into<LatentShape>) -> LatentShape {
    spec.into()
}

impl From<usize> for LatentShape {
    fn from(d: usize) -> Self {
        Self(vec![d])
    }
}

impl From<Vec<usize>> for LatentShape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<&[usize]> for LatentShape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for LatentShape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.to_vec())
    }
}

// Tuple display: (3,) for rank 1, (2, 5) otherwise
impl fmt::Display for LatentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [d] => write!(f, "({d},)"),
            dims => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}
