// ============================================================
// Layer 5 — Shared tensor helpers for the stochastic layers
// ============================================================

use burn::{prelude::*, tensor::Distribution};

/// Standard Gumbel noise `-log(-log(u + eps) + eps)`, `u ~ U(0, 1)`,
/// shaped like `x`. Never tracked by autodiff.
pub fn gumbel_noise_like<B: Backend, const D: usize>(x: &Tensor<B, D>, eps: f64) -> Tensor<B, D> {
    x.random_like(Distribution::Uniform(0.0, 1.0))
        .add_scalar(eps)
        .log()
        .neg()
        .add_scalar(eps)
        .log()
        .neg()
}

/// Rows of a one-hot matrix: 1 at `index` along `dim`, 0 elsewhere.
///
/// `index` has size 1 along `dim` (as returned by `argmax(dim)`).
pub fn one_hot_along<B: Backend>(
    index:  Tensor<B, 2, Int>,
    shape:  [usize; 2],
    dim:    usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let ones = Tensor::ones(index.dims(), device);
    Tensor::zeros(shape, device).scatter(dim, index, ones)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_one_hot_rows() {
        let device = Default::default();
        let index  = Tensor::<TestBackend, 1, Int>::from_ints([2, 0].as_slice(), &device).reshape([2, 1]);
        let hot: Vec<f32> = one_hot_along(index, [2, 3], 1, &device).into_data().to_vec().unwrap();
        assert_eq!(hot, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_gumbel_noise_is_finite() {
        let x = Tensor::<TestBackend, 2>::zeros([64, 8], &Default::default());
        let g: Vec<f32> = gumbel_noise_like(&x, 1e-10).into_data().to_vec().unwrap();
        assert!(g.iter().all(|v| v.is_finite()));
    }
}
