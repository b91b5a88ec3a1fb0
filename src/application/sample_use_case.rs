// ============================================================
// Layer 2 — SampleUseCase
// ============================================================
// Pushes random parameters through each stochastic layer and
// reports whether the forward values look right:
//
//   categorical  rows with exactly one active category
//   gumbel       worst |row sum - 1|, one-hot rows if hard
//   gaussian     mean KL to N(0, I) and mean of the samples
//
// Reference: Burn Book §3 (Building Blocks)

use anyhow::{anyhow, Result};
use burn::{prelude::*, tensor::Distribution};
use serde::{Deserialize, Serialize};

use crate::domain::shape::as_shape;
use crate::ml::{
    categorical::CategoricalStraightThroughConfig,
    gaussian::{kl_divergence, DiagonalGaussianConfig},
    gumbel::GumbelSoftmaxConfig,
    stochastic::{DistributionParams, StochasticLayer},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    pub latent_dim: usize,
    pub rows:       usize,
    pub tau:        f64,
    pub hard:       bool,
    pub normalise:  bool,
    pub seed:       u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            latent_dim: 8,
            rows:       64,
            tau:        1.0,
            hard:       false,
            normalise:  false,
            seed:       42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleReport {
    pub latent_dim:          usize,
    pub rows:                usize,
    pub categorical_one_hot: usize,
    pub gumbel_row_sum_err:  f32,
    /// Only counted in hard mode
    pub gumbel_one_hot:      Option<usize>,
    pub gaussian_mean_kl:    f32,
    pub gaussian_mean:       f32,
}

pub struct SampleUseCase {
    config: SampleConfig,
}

impl SampleUseCase {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<SampleReport> {
        let cfg   = &self.config;
        let shape = [cfg.rows, cfg.latent_dim];
        B::seed(cfg.seed);

        let categorical: StochasticLayer<B> = CategoricalStraightThroughConfig::new(as_shape(cfg.latent_dim))
            .with_normalise(cfg.normalise)
            .init::<B>(device)?
            .into();
        let gumbel: StochasticLayer<B> = GumbelSoftmaxConfig::new()
            .with_tau(cfg.tau)
            .with_hard(cfg.hard)
            .init()?
            .into();
        let gaussian: StochasticLayer<B> = DiagonalGaussianConfig::new(as_shape(cfg.latent_dim)).init()?.into();

        let logits = Tensor::<B, 2>::random(shape, Distribution::Normal(0.0, 2.0), device);

        // ── Categorical straight-through ──────────────────────────────────────
        let sample = categorical.sample(DistributionParams::Logits(logits.clone()))?.sample;
        let categorical_one_hot = rows(sample, cfg.latent_dim)?
            .iter()
            .filter(|r| is_one_hot(r))
            .count();

        // ── Gumbel-softmax ────────────────────────────────────────────────────
        let y    = rows(gumbel.sample(DistributionParams::Logits(logits))?.sample, cfg.latent_dim)?;
        let sums = y.iter().map(|r| (r.iter().sum::<f32>() - 1.0).abs());
        let gumbel_row_sum_err = sums.fold(0.0_f32, f32::max);
        let gumbel_one_hot     = cfg.hard.then(|| y.iter().filter(|r| is_one_hot(r)).count());

        // ── Diagonal Gaussian ─────────────────────────────────────────────────
        let mu     = Tensor::<B, 2>::random(shape, Distribution::Normal(0.0, 1.0), device);
        let logvar = Tensor::<B, 2>::random(shape, Distribution::Uniform(-1.0, 1.0), device);
        let sample = gaussian
            .sample(DistributionParams::Gaussian { mu: mu.clone(), logvar: logvar.clone() })?
            .sample;
        let kl = kl_divergence(mu, logvar, None, None)?;

        let report = SampleReport {
            latent_dim: cfg.latent_dim,
            rows:       cfg.rows,
            categorical_one_hot,
            gumbel_row_sum_err,
            gumbel_one_hot,
            gaussian_mean_kl: mean(kl)?,
            gaussian_mean:    mean(sample)?,
        };
        tracing::info!(
            "Sampled {} rows: {} one-hot categorical, max Gumbel row-sum error {:.2e}",
            report.rows,
            report.categorical_one_hot,
            report.gumbel_row_sum_err,
        );
        Ok(report)
    }
}

fn values<B: Backend, const D: usize>(t: Tensor<B, D>) -> Result<Vec<f32>> {
    t.into_data()
        .to_vec()
        .map_err(|e| anyhow!("Cannot read tensor values: {e:?}"))
}

fn rows<B: Backend, const D: usize>(t: Tensor<B, D>, width: usize) -> Result<Vec<Vec<f32>>> {
    Ok(values(t)?.chunks(width).map(<[f32]>::to_vec).collect())
}

fn mean<B: Backend, const D: usize>(t: Tensor<B, D>) -> Result<f32> {
    let v = values(t)?;
    Ok(v.iter().sum::<f32>() / v.len().max(1) as f32)
}

fn is_one_hot(row: &[f32]) -> bool {
    let ones  = row.iter().filter(|v| (**v - 1.0).abs() < 1e-5).count();
    let zeros = row.iter().filter(|v| v.abs() < 1e-5).count();
    ones == 1 && zeros == row.len() - 1
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_soft_report() {
        let cfg    = SampleConfig { rows: 16, latent_dim: 5, ..Default::default() };
        let report = SampleUseCase::new(cfg).execute::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(report.categorical_one_hot, 16);
        assert!(report.gumbel_row_sum_err < 1e-4);
        assert_eq!(report.gumbel_one_hot, None);
        assert!(report.gaussian_mean_kl >= 0.0);
    }

    #[test]
    fn test_hard_report_counts_one_hot_rows() {
        let cfg    = SampleConfig { rows: 12, latent_dim: 4, hard: true, tau: 0.5, ..Default::default() };
        let report = SampleUseCase::new(cfg).execute::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(report.gumbel_one_hot, Some(12));
    }

    #[test]
    fn test_invalid_settings_are_reported() {
        let cfg = SampleConfig { latent_dim: 0, ..Default::default() };
        assert!(SampleUseCase::new(cfg).execute::<TestBackend>(&Default::default()).is_err());

        let cfg = SampleConfig { tau: 0.0, ..Default::default() };
        assert!(SampleUseCase::new(cfg).execute::<TestBackend>(&Default::default()).is_err());
    }

    #[test]
    fn test_one_hot_check() {
        assert!(is_one_hot(&[0.0, 1.0, 0.0]));
        assert!(!is_one_hot(&[0.5, 0.5, 0.0]));
        assert!(!is_one_hot(&[1.0, 1.0, 0.0]));
    }
}
