// ============================================================
// Layer 4 — Walk-back Chain Generator
// ============================================================
// Produces the sequence of corrupted states for one seed batch:
//
//   c_0 = corrupt(seed)
//   c_1 = corrupt(step(c_0))
//   c_2 = corrupt(step(c_1))
//   ...
//   c_{n-1} = corrupt(step(c_{n-2}))
//
// The step function is applied to the previous CORRUPTED state,
// so noise accumulates along the chain. A denoiser trained on
// every position learns to undo the mistakes it makes itself.
//
// Both collaborators are fallible closures. Their error type E
// is the caller's own; an error aborts the chain immediately and
// is handed back untouched (no partial chain survives).
//
// Reference: Bengio et al. (2013) Generalized Denoising Auto-Encoders
//            Rust Book §13 (Closures)

use burn::prelude::*;

use crate::domain::error::WalkbackError;

/// Build a walk-back chain of exactly `n` tensors from `seed`.
///
/// Invokes `corrupt` `n` times and `step` `n - 1` times. Every
/// emitted tensor must keep the seed's shape; a collaborator that
/// changes it is reported as [`WalkbackError::ShapeMismatch`].
///
/// `n == 0` yields an empty chain and calls neither function.
///
/// Every input handed to `step` or `corrupt` is detached first, so
/// gradient recording is off across the chain even on an autodiff
/// backend with a tracked model.
pub fn generate_chain<B, const D: usize, E, S, C>(
    seed:    Tensor<B, D>,
    step:    &mut S,
    corrupt: &mut C,
    n:       usize,
) -> Result<Vec<Tensor<B, D>>, E>
where
    B: Backend,
    E: From<WalkbackError>,
    S: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
    C: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
{
    let mut chain = Vec::with_capacity(n);
    if n == 0 {
        return Ok(chain);
    }

    let dims = seed.dims();

    // Collaborators only ever see detached inputs, so no autodiff
    // graph spans more than one call.
    let mut current = checked(corrupt(seed.detach())?, &dims)?;
    chain.push(current.clone());

    for _ in 1..n {
        let stepped = checked(step(current.detach())?, &dims)?;
        current     = checked(corrupt(stepped.detach())?, &dims)?;
        chain.push(current.clone());
    }

    Ok(chain)
}

fn checked<B: Backend, const D: usize>(
    t:    Tensor<B, D>,
    dims: &[usize; D],
) -> Result<Tensor<B, D>, WalkbackError> {
    let got = t.dims();
    if &got != dims {
        return Err(WalkbackError::shape_mismatch(dims, &got));
    }
    Ok(t)
}
