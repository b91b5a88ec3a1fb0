// ============================================================
// Layer 5 — Diagonal Gaussian Reparameterisation
// ============================================================
// Sampling N(mu, diag(exp(logvar))) as a differentiable function
// of its parameters:
//
//   sample = mu + exp(logvar / 2) * eps,   eps ~ N(0, I)
//
// eps is drawn outside the graph, so gradients reach mu and
// logvar through the affine map only.
//
// KL divergence, reduced over the last (latent) axis:
//
//   KL(q || N(0, I)) = 0.5 * (Σ mu² + exp(lv) - lv  - D)
//   KL(q || p)       = 0.5 * (Σ lv1 - lv2
//                                + (mu1 - mu2)² / exp(lv2)
//                                + exp(lv1 - lv2)           - D)
//
// Reference: Kingma & Welling (2014) Auto-Encoding Variational Bayes

use burn::{prelude::*, tensor::Distribution};

use crate::domain::{
    error::{WalkbackError, WalkbackResult},
    shape::LatentShape,
};

#[derive(Config, Debug)]
pub struct DiagonalGaussianConfig {
    /// Must be `(D,)`
    pub latent_shape: LatentShape,
}

impl DiagonalGaussianConfig {
    pub fn init(&self) -> WalkbackResult<DiagonalGaussian> {
        Ok(DiagonalGaussian {
            latent_dim: self.latent_shape.vector_dim()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalGaussian {
    latent_dim: usize,
}

/// Output of [`DiagonalGaussian::forward`].
#[derive(Debug, Clone)]
pub struct GaussianSample<B: Backend, const D: usize> {
    /// Same shape as the input parameters
    pub sample: Tensor<B, D>,

    /// shape: [rows, latent_dim]
    pub mu: Tensor<B, 2>,

    /// shape: [rows, latent_dim]
    pub logvar: Tensor<B, 2>,
}

impl DiagonalGaussian {
    pub fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    pub fn forward<B: Backend, const D: usize>(
        &self,
        mu:     Tensor<B, D>,
        logvar: Tensor<B, D>,
    ) -> WalkbackResult<GaussianSample<B, D>> {
        let dims = mu.dims();
        if logvar.dims() != dims {
            return Err(WalkbackError::shape_mismatch(&dims, &logvar.dims()));
        }
        let numel = mu.shape().num_elements();
        if numel % self.latent_dim != 0 {
            return Err(WalkbackError::shape_mismatch(&[self.latent_dim], &dims));
        }
        let rows = numel / self.latent_dim;

        let mu     = mu.reshape([rows, self.latent_dim]);
        let logvar = logvar.reshape([rows, self.latent_dim]);

        let noise  = mu.random_like(Distribution::Normal(0.0, 1.0)).detach();
        let std    = logvar.clone().div_scalar(2.0).exp();
        let sample = noise * std + mu.clone();

        Ok(GaussianSample {
            sample: sample.reshape(dims),
            mu,
            logvar,
        })
    }
}

/// KL divergence of `N(mu1, exp(logvar1))` from either the standard
/// normal (`mu2`, `logvar2` both `None`) or `N(mu2, exp(logvar2))`.
///
/// The last axis is reduced and kept with size 1.
pub fn kl_divergence<B: Backend, const D: usize>(
    mu1:     Tensor<B, D>,
    logvar1: Tensor<B, D>,
    mu2:     Option<Tensor<B, D>>,
    logvar2: Option<Tensor<B, D>>,
) -> WalkbackResult<Tensor<B, D>> {
    let dims = mu1.dims();
    if logvar1.dims() != dims {
        return Err(WalkbackError::shape_mismatch(&dims, &logvar1.dims()));
    }
    let axis   = D - 1;
    let latent = dims[axis] as f64;

    let summed = match (mu2, logvar2) {
        (None, None) => {
            let terms = mu1.clone() * mu1 + logvar1.clone().exp() - logvar1;
            terms.sum_dim(axis)
        }
        (Some(mu2), Some(logvar2)) => {
            for other in [mu2.dims(), logvar2.dims()] {
                if other != dims {
                    return Err(WalkbackError::shape_mismatch(&dims, &other));
                }
            }
            let diff  = mu1 - mu2;
            let log_r = logvar1 - logvar2.clone();
            let terms = log_r.clone() + diff.clone() * diff * logvar2.neg().exp() + log_r.exp();
            terms.sum_dim(axis)
        }
        _ => {
            return Err(WalkbackError::contract(
                "mu2 and logvar2 must be given together or not at all",
            ))
        }
    };

    Ok(summed.sub_scalar(latent).mul_scalar(0.5))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shape::as_shape;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = NdArray;
    type TestAutodiffBackend = Autodiff<NdArray>;

    fn values<const D: usize>(t: Tensor<TestBackend, D>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    fn random<const D: usize>(shape: [usize; D]) -> Tensor<TestBackend, D> {
        Tensor::random(shape, Distribution::Normal(0.0, 1.0), &Default::default())
    }

    #[test]
    fn test_multi_dimensional_latent_shape_is_rejected() {
        let result = DiagonalGaussianConfig::new(as_shape([2, 3])).init();
        assert!(matches!(result, Err(WalkbackError::InvalidLatentShape { .. })));
    }

    #[test]
    fn test_sample_keeps_shape_and_flattens_statistics() {
        let layer = DiagonalGaussianConfig::new(as_shape(4)).init().unwrap();
        let out   = layer.forward(random([2, 3, 4]), random([2, 3, 4])).unwrap();
        assert_eq!(out.sample.dims(), [2, 3, 4]);
        assert_eq!(out.mu.dims(), [6, 4]);
        assert_eq!(out.logvar.dims(), [6, 4]);
    }

    #[test]
    fn test_vanishing_variance_returns_the_mean() {
        let device = Default::default();
        let layer  = DiagonalGaussianConfig::new(as_shape(3)).init().unwrap();
        let mu     = Tensor::<TestBackend, 2>::from_floats([[1.0, -2.0, 3.0], [0.5, 0.0, -0.5]], &device);
        let logvar = Tensor::<TestBackend, 2>::full([2, 3], -60.0, &device);

        let out = layer.forward(mu.clone(), logvar).unwrap();
        for (s, m) in values(out.sample).iter().zip(values(mu)) {
            assert!((s - m).abs() < 1e-5);
        }
    }

    #[test]
    fn test_reparameterisation_gradients() {
        // sample = mu + exp(lv / 2) * eps
        //   d sample / d mu = 1,  d sample / d lv = 0.5 * (sample - mu)
        let device = Default::default();
        let layer  = DiagonalGaussianConfig::new(as_shape(3)).init().unwrap();
        let mu_data = [[0.5, -1.0, 2.0], [0.0, 3.0, -0.5]];
        let lv_data = [[0.0, 1.0, -1.0], [2.0, -0.5, 0.4]];

        let mu     = Tensor::<TestAutodiffBackend, 2>::from_floats(mu_data, &device).require_grad();
        let logvar = Tensor::<TestAutodiffBackend, 2>::from_floats(lv_data, &device).require_grad();
        let sample = layer.forward(mu.clone(), logvar.clone()).unwrap().sample;
        let grads  = sample.clone().sum().backward();

        let d_mu: Vec<f32> = mu.grad(&grads).unwrap().into_data().to_vec().unwrap();
        let d_lv: Vec<f32> = logvar.grad(&grads).unwrap().into_data().to_vec().unwrap();
        let drawn: Vec<f32> = sample.inner().into_data().to_vec().unwrap();
        let means: Vec<f32> = mu_data.iter().flatten().copied().collect();

        assert!(d_mu.iter().all(|g| (g - 1.0).abs() < 1e-6), "{d_mu:?}");
        for ((g, s), m) in d_lv.iter().zip(&drawn).zip(&means) {
            assert!((g - 0.5 * (s - m)).abs() < 1e-4, "d/dlogvar {g} != 0.5 * ({s} - {m})");
        }
    }

    #[test]
    fn test_sample_spread_follows_logvar() {
        // logvar = 2 ln(sigma) → empirical std ≈ sigma
        let device = Default::default();
        let layer  = DiagonalGaussianConfig::new(as_shape(4)).init().unwrap();
        let sigma  = 3.0_f32;
        let mu     = Tensor::<TestBackend, 2>::zeros([5000, 4], &device);
        let logvar = Tensor::<TestBackend, 2>::full([5000, 4], 2.0 * sigma.ln(), &device);

        let drawn = values(layer.forward(mu, logvar).unwrap().sample);
        let n     = drawn.len() as f32;
        let mean  = drawn.iter().sum::<f32>() / n;
        let std   = (drawn.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n).sqrt();
        assert!((std - sigma).abs() < 0.15, "empirical std {std}, expected {sigma}");
        assert!(mean.abs() < 0.15);
    }

    #[test]
    fn test_mismatched_parameters_are_rejected() {
        let layer = DiagonalGaussianConfig::new(as_shape(4)).init().unwrap();
        let err   = layer.forward(random([2, 4]), random([3, 4]));
        assert!(matches!(err, Err(WalkbackError::ShapeMismatch { .. })));

        let err = layer.forward(random([2, 3]), random([2, 3]));
        assert!(matches!(err, Err(WalkbackError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_kl_of_a_distribution_with_itself_is_zero() {
        let mu     = random([5, 6]);
        let logvar = random([5, 6]);
        let kl = kl_divergence(mu.clone(), logvar.clone(), Some(mu), Some(logvar)).unwrap();
        assert_eq!(kl.dims(), [5, 1]);
        assert!(values(kl).iter().all(|v| v.abs() < 1e-5));
    }

    #[test]
    fn test_kl_of_standard_normal_is_zero() {
        let zeros = Tensor::<TestBackend, 2>::zeros([3, 4], &Default::default());
        let kl    = kl_divergence(zeros.clone(), zeros, None, None).unwrap();
        assert!(values(kl).iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_kl_against_standard_normal_matches_closed_form() {
        let device = Default::default();
        let mu     = Tensor::<TestBackend, 2>::ones([2, 1], &device);
        let logvar = Tensor::<TestBackend, 2>::zeros([2, 1], &device);
        let kl     = kl_divergence(mu, logvar, None, None).unwrap();
        assert!(values(kl).iter().all(|v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_kl_between_distinct_gaussians_matches_closed_form() {
        // 0.5 * ((lv1 - lv2) + (mu1 - mu2)^2 / e^lv2 + e^(lv1 - lv2) - D)
        //   mu1=1, lv1=0, mu2=0, lv2=1  →  0.5 * (-1 + 2/e - 1)
        let device = Default::default();
        let kl = kl_divergence(
            Tensor::<TestBackend, 2>::from_floats([[1.0]], &device),
            Tensor::<TestBackend, 2>::from_floats([[0.0]], &device),
            Some(Tensor::<TestBackend, 2>::from_floats([[0.0]], &device)),
            Some(Tensor::<TestBackend, 2>::from_floats([[1.0]], &device)),
        )
        .unwrap();
        let want = 0.5 * (-2.0 + 2.0 * (-1.0_f32).exp());
        assert!((values(kl)[0] - want).abs() < 1e-5);

        // D=2, summed per row: row 0 = (mu1=[0, 2], lv1=[1, 0]) vs (mu2=[1, 0], lv2=[0, 2])
        let kl = kl_divergence(
            Tensor::<TestBackend, 2>::from_floats([[0.0, 2.0]], &device),
            Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0]], &device),
            Some(Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0]], &device)),
            Some(Tensor::<TestBackend, 2>::from_floats([[0.0, 2.0]], &device)),
        )
        .unwrap();
        let e = std::f32::consts::E;
        let first  = 1.0 + 1.0 + e;                             // lv diff, dmu²/e^0, e^1
        let second = -2.0 + 4.0 / (e * e) + 1.0 / (e * e);      // lv diff, dmu²/e², e^-2
        let want   = 0.5 * (first + second - 2.0);
        assert!((values(kl)[0] - want).abs() < 1e-4);
    }

    #[test]
    fn test_kl_preserves_leading_axes() {
        let kl = kl_divergence(random([2, 2, 5]), random([2, 2, 5]), None, None).unwrap();
        assert_eq!(kl.dims(), [2, 2, 1]);
    }

    #[test]
    fn test_kl_rejects_half_specified_reference() {
        let mu = random([2, 3]);
        let lv = random([2, 3]);
        let err = kl_divergence(mu.clone(), lv.clone(), Some(mu.clone()), None);
        assert!(matches!(err, Err(WalkbackError::ContractViolation(_))));

        let err = kl_divergence(mu, lv.clone(), None, Some(lv));
        assert!(matches!(err, Err(WalkbackError::ContractViolation(_))));
    }

    #[test]
    fn test_kl_rejects_mismatched_reference() {
        let err = kl_divergence(random([2, 3]), random([2, 3]), Some(random([2, 4])), Some(random([2, 3])));
        assert!(matches!(err, Err(WalkbackError::ShapeMismatch { .. })));
    }
}
