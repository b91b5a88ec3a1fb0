// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `build` and `sample`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for bad values
//   - type conversion (string → usize, f64, enum, ...)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    build_use_case::{BuildConfig, CorruptionKind},
    sample_use_case::SampleConfig,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialise a walk-back dataset on synthetic clustered data
    Build(BuildArgs),

    /// Run the stochastic layers on random parameters
    Sample(SampleArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CorruptionArg {
    Gaussian,
    Masking,
    SaltAndPepper,
}

impl From<CorruptionArg> for CorruptionKind {
    fn from(a: CorruptionArg) -> Self {
        match a {
            CorruptionArg::Gaussian => CorruptionKind::Gaussian,
            CorruptionArg::Masking => CorruptionKind::Masking,
            CorruptionArg::SaltAndPepper => CorruptionKind::SaltAndPepper,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Number of synthetic base samples
    #[arg(long, default_value_t = 1000)]
    pub samples: usize,

    /// Width of every sample
    #[arg(long, default_value_t = 8)]
    pub dim: usize,

    /// Number of cluster centres the samples are drawn around
    #[arg(long, default_value_t = 4)]
    pub clusters: usize,

    /// corrupt(step(·)) applications after the first corruption
    #[arg(long, default_value_t = 5)]
    pub n_walkback: usize,

    /// Base samples pushed through the denoiser at once
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Hidden width of the MLP denoiser
    #[arg(long, default_value_t = 32)]
    pub hidden_dim: usize,

    #[arg(long, value_enum, default_value_t = CorruptionArg::Gaussian)]
    pub corruption: CorruptionArg,

    /// Std for gaussian noise, probability for masking / salt-and-pepper
    #[arg(long, default_value_t = 0.1)]
    pub noise: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Append per-position metrics to <DIR>/chain_metrics.csv
    #[arg(long)]
    pub metrics_dir: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<&BuildArgs> for BuildConfig {
    fn from(a: &BuildArgs) -> Self {
        BuildConfig {
            samples:     a.samples,
            dim:         a.dim,
            clusters:    a.clusters,
            n_walkback:  a.n_walkback,
            batch_size:  a.batch_size,
            hidden_dim:  a.hidden_dim,
            corruption:  a.corruption.into(),
            noise:       a.noise,
            seed:        a.seed,
            metrics_dir: a.metrics_dir.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Number of categories / Gaussian dimensions
    #[arg(long, default_value_t = 8)]
    pub latent_dim: usize,

    #[arg(long, default_value_t = 64)]
    pub rows: usize,

    /// Gumbel-softmax temperature
    #[arg(long, default_value_t = 1.0)]
    pub tau: f64,

    /// Straight-through one-hot Gumbel samples
    #[arg(long)]
    pub hard: bool,

    /// Normalise categorical logits with log-sum-exp
    #[arg(long)]
    pub normalise: bool,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<&SampleArgs> for SampleConfig {
    fn from(a: &SampleArgs) -> Self {
        SampleConfig {
            latent_dim: a.latent_dim,
            rows:       a.rows,
            tau:        a.tau,
            hard:       a.hard,
            normalise:  a.normalise,
            seed:       a.seed,
        }
    }
}
