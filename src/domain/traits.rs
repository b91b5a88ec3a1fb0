// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The walk-back machinery only ever sees closures of the form
// `FnMut(Tensor) -> Result<Tensor, E>`. The traits below give
// the concrete collaborators shipped with this crate a common
// shape so they can be turned into such closures in one line:
//
//   let noise = CorruptionConfig::Gaussian { std: 0.1 };
//   let mut corrupt = |x| Ok::<_, WalkbackError>(noise.corrupt(x));
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §13 (Closures)

use burn::prelude::*;

// ─── Corruption ───────────────────────────────────────────────────────────────
/// Any component that injects noise into a tensor.
///
/// Implementations:
///   - CorruptionConfig → Gaussian, masking and salt-and-pepper noise
pub trait Corruption {
    /// Return a corrupted copy of `x` with the same shape.
    fn corrupt<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D>;
}

// ─── StepFunction ─────────────────────────────────────────────────────────────
/// Any component that maps a (corrupted) batch to a (denoised) batch.
///
/// Implementations:
///   - Denoiser → the MLP used by the `walkback build` command
pub trait StepFunction<B: Backend> {
    /// Apply one denoising step.
    fn step<const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D>;
}
