// ============================================================
// Layer 4 — Corruption Functions
// ============================================================
// Concrete noise injectors for the walk-back chain. The chain
// itself accepts any closure; these are the ones the CLI offers.
//
//   Gaussian       x + N(0, std²)
//   Masking        each element zeroed with probability drop_prob
//   SaltAndPepper  each element replaced by `low` or `high`
//                  (equal odds) with probability prob
//
// All noise is drawn on the tensor's own device with Burn's
// Distribution, so seeding the backend makes runs repeatable.
//
// Reference: Vincent et al. (2008) Denoising Autoencoders
//            Burn Book §3 (Tensor: random / random_like)

use burn::{prelude::*, tensor::Distribution};

use crate::domain::{
    error::{WalkbackError, WalkbackResult},
    traits::Corruption,
};

/// Serializable choice of noise process.
#[derive(Config, Debug, PartialEq)]
pub enum CorruptionConfig {
    /// Additive isotropic Gaussian noise
    Gaussian { std: f64 },

    /// Dropout-style masking noise (no rescaling)
    Masking { drop_prob: f64 },

    /// Impulse noise towards two fixed values
    SaltAndPepper { prob: f64, low: f64, high: f64 },
}

impl CorruptionConfig {
    /// Reject parameters that do not describe a valid noise process.
    pub fn validate(&self) -> WalkbackResult<()> {
        match self {
            Self::Gaussian { std } if *std < 0.0 || !std.is_finite() => Err(
                WalkbackError::invalid_config(format!("gaussian std must be >= 0, got {std}")),
            ),
            Self::Masking { drop_prob } if !(0.0..=1.0).contains(drop_prob) => Err(
                WalkbackError::invalid_config(format!("drop_prob must be in [0, 1], got {drop_prob}")),
            ),
            Self::SaltAndPepper { prob, .. } if !(0.0..=1.0).contains(prob) => Err(
                WalkbackError::invalid_config(format!("salt-and-pepper prob must be in [0, 1], got {prob}")),
            ),
            _ => Ok(()),
        }
    }
}

impl Corruption for CorruptionConfig {
    fn corrupt<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match *self {
            Self::Gaussian { std } => {
                let noise = x.random_like(Distribution::Normal(0.0, std));
                x + noise
            }
            Self::Masking { drop_prob } => {
                // Bernoulli(p) draws 1 with probability p → keep mask
                let keep = x.random_like(Distribution::Bernoulli(1.0 - drop_prob));
                x * keep
            }
            Self::SaltAndPepper { prob, low, high } => {
                let hit  = x.random_like(Distribution::Bernoulli(prob));
                let salt = x.random_like(Distribution::Bernoulli(0.5));
                // replacement value: low + (high - low) * salt
                let value = salt.mul_scalar(high - low).add_scalar(low);
                let keep  = hit.clone().neg().add_scalar(1.0);
                x * keep + value * hit
            }
        }
    }
}
