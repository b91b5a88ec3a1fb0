// ============================================================
// Layer 2 — BuildUseCase
// ============================================================
// Runs the walk-back pipeline end to end on synthetic data:
//
//   Step 1: Seed the backend and the data generator
//   Step 2: Synthesise clustered rows     (rand)
//   Step 3: Wrap them in a Burn dataset   (Layer 4 - data)
//   Step 4: Build the MLP denoiser        (Layer 5 - ml)
//   Step 5: Materialise the chain         (Layer 4 - data)
//   Step 6: Check the flat length
//   Step 7: Summarise per-position drift  (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §4 (Datasets)

use anyhow::{bail, Context, Result};
use burn::{data::dataset::InMemDataset, prelude::*};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::RowBatcher,
    corruption::CorruptionConfig,
    dataset::{DevicePlacement, WalkbackConfig},
};
use crate::domain::{
    error::WalkbackError,
    traits::{Corruption, StepFunction},
};
use crate::infra::metrics::{chain_step_mse, ChainStepMetrics, MetricsLogger};
use crate::ml::model::DenoiserConfig;

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorruptionKind {
    Gaussian,
    Masking,
    SaltAndPepper,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub samples:     usize,
    pub dim:         usize,
    pub clusters:    usize,
    pub n_walkback:  usize,
    pub batch_size:  usize,
    pub hidden_dim:  usize,
    pub corruption:  CorruptionKind,
    pub noise:       f64,
    pub seed:        u64,
    pub metrics_dir: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            samples:     1000,
            dim:         8,
            clusters:    4,
            n_walkback:  5,
            batch_size:  256,
            hidden_dim:  32,
            corruption:  CorruptionKind::Gaussian,
            noise:       0.1,
            seed:        42,
            metrics_dir: None,
        }
    }
}

impl BuildConfig {
    /// `noise` is the std for Gaussian noise and the probability otherwise.
    pub fn corruption_config(&self) -> CorruptionConfig {
        match self.corruption {
            CorruptionKind::Gaussian => CorruptionConfig::Gaussian { std: self.noise },
            CorruptionKind::Masking => CorruptionConfig::Masking { drop_prob: self.noise },
            CorruptionKind::SaltAndPepper => CorruptionConfig::SaltAndPepper {
                prob: self.noise,
                low:  -1.0,
                high: 1.0,
            },
        }
    }
}

// ─── Summary ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkbackSummary {
    pub samples:         usize,
    pub dim:             usize,
    pub batch_size:      usize,
    pub num_batches:     usize,
    pub last_batch_size: usize,
    pub chain_len:       usize,
    pub len:             usize,
    pub metrics:         Vec<ChainStepMetrics>,
}

// ─── BuildUseCase ─────────────────────────────────────────────────────────────
pub struct BuildUseCase {
    config: BuildConfig,
}

impl BuildUseCase {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<WalkbackSummary> {
        let cfg = &self.config;
        if cfg.dim == 0 || cfg.clusters == 0 {
            bail!("--dim and --clusters must be positive");
        }
        let noise = cfg.corruption_config();
        noise.validate()?;

        // ── Step 1 + 2: Seeded synthetic rows ────────────────────────────────
        B::seed(cfg.seed);
        let rows = synthesise_clusters(cfg.samples, cfg.dim, cfg.clusters, cfg.seed);
        tracing::info!("Synthesised {} rows of width {} around {} centres", rows.len(), cfg.dim, cfg.clusters);

        // ── Step 3: Burn dataset + batcher ────────────────────────────────────
        let base    = InMemDataset::new(rows);
        let batcher = RowBatcher::<B>::new(device.clone());

        // ── Step 4: Denoiser ──────────────────────────────────────────────────
        let model = DenoiserConfig::new(cfg.dim, cfg.hidden_dim).init::<B>(device);

        // ── Step 5: Walk-back chain ───────────────────────────────────────────
        let walkback = WalkbackConfig::new()
            .with_n_walkback(cfg.n_walkback)
            .with_batch_size(cfg.batch_size);
        let dataset = walkback
            .build_from_dataset(
                &base,
                &batcher,
                |x: Tensor<B, 2>| Ok::<_, WalkbackError>(model.step(x)),
                |x: Tensor<B, 2>| Ok::<_, WalkbackError>(noise.corrupt(x)),
                &DevicePlacement::single(device.clone()),
            )
            .context("Failed to materialise the walk-back dataset")?;

        // ── Step 6: Closed-form length ────────────────────────────────────────
        let num_batches = dataset.num_batches();
        let last        = dataset.batch_size_at(num_batches - 1);
        let expected    = (num_batches - 1) * cfg.batch_size * walkback.chain_len() + walkback.chain_len() * last;
        if dataset.len() != expected {
            bail!("Walk-back dataset has {} items, expected {}", dataset.len(), expected);
        }

        // ── Step 7: Metrics ───────────────────────────────────────────────────
        let metrics = chain_step_mse(&dataset);
        if let Some(dir) = &cfg.metrics_dir {
            let logger = MetricsLogger::new(dir)?;
            logger.log(&metrics)?;
            tracing::info!("Chain metrics appended to '{}'", logger.csv_path().display());
        }

        Ok(WalkbackSummary {
            samples:         cfg.samples,
            dim:             cfg.dim,
            batch_size:      cfg.batch_size,
            num_batches,
            last_batch_size: last,
            chain_len:       dataset.chain_len(),
            len:             dataset.len(),
            metrics,
        })
    }
}

// ─── Synthetic Data ───────────────────────────────────────────────────────────
// Centres uniform in [-1, 1]^dim, points jittered uniformly by ±0.1
// around a centre picked round-robin.
fn synthesise_clusters(samples: usize, dim: usize, clusters: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let centres: Vec<Vec<f32>> = (0..clusters)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0_f32..1.0)).collect())
        .collect();

    (0..samples)
        .map(|i| {
            centres[i % clusters]
                .iter()
                .map(|c| *c + rng.gen_range(-0.1_f32..0.1))
                .collect()
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn small() -> BuildConfig {
        BuildConfig {
            samples:    5,
            dim:        3,
            clusters:   2,
            n_walkback: 1,
            batch_size: 2,
            hidden_dim: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_synthetic_rows_are_seeded() {
        let a = synthesise_clusters(10, 4, 3, 7);
        assert_eq!(a.len(), 10);
        assert!(a.iter().all(|r| r.len() == 4));
        assert_eq!(a, synthesise_clusters(10, 4, 3, 7));
    }

    #[test]
    fn test_five_sample_scenario() {
        let summary = BuildUseCase::new(small()).execute::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(summary.num_batches, 3);
        assert_eq!(summary.last_batch_size, 1);
        assert_eq!(summary.chain_len, 3);
        assert_eq!(summary.len, 15);
        assert_eq!(summary.metrics.len(), 3);
        assert!(summary.metrics[0].mse.abs() < 1e-12);
    }

    #[test]
    fn test_every_corruption_kind_runs() {
        for corruption in [CorruptionKind::Gaussian, CorruptionKind::Masking, CorruptionKind::SaltAndPepper] {
            let cfg = BuildConfig { corruption, noise: 0.3, ..small() };
            assert!(BuildUseCase::new(cfg).execute::<TestBackend>(&Default::default()).is_ok());
        }
    }

    #[test]
    fn test_invalid_noise_is_rejected() {
        let cfg = BuildConfig { corruption: CorruptionKind::Masking, noise: 1.5, ..small() };
        assert!(BuildUseCase::new(cfg).execute::<TestBackend>(&Default::default()).is_err());
    }

    #[test]
    fn test_empty_base_collection_is_an_error() {
        let cfg = BuildConfig { samples: 0, ..small() };
        assert!(BuildUseCase::new(cfg).execute::<TestBackend>(&Default::default()).is_err());
    }

    #[test]
    fn test_metrics_are_written_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BuildConfig {
            metrics_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..small()
        };
        BuildUseCase::new(cfg).execute::<TestBackend>(&Default::default()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("chain_metrics.csv")).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
