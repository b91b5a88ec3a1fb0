// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `build`  — materialises a walk-back dataset and reports
//                 its layout and per-position drift
//   2. `sample` — exercises the stochastic layers
//
// Everything runs on the NdArray (CPU) backend.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use burn::backend::NdArray;
use clap::Parser;
use commands::{BuildArgs, Commands, SampleArgs};

use crate::application::{
    build_use_case::{BuildUseCase, WalkbackSummary},
    sample_use_case::{SampleReport, SampleUseCase},
};

type CliBackend = NdArray;

#[derive(Parser, Debug)]
#[command(
    name = "walkback",
    version,
    about = "Build walk-back denoising datasets and exercise stochastic sampling layers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case. The CLI layer only routes, never computes.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Build(args) => self.run_build(args),
            Commands::Sample(args) => self.run_sample(args),
        }
    }

    fn run_build(&self, args: &BuildArgs) -> Result<()> {
        tracing::info!(
            "Building walk-back dataset: {} samples, n_walkback={}, batch_size={}",
            args.samples,
            args.n_walkback,
            args.batch_size
        );

        let summary = BuildUseCase::new(args.into()).execute::<CliBackend>(&Default::default())?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
        Ok(())
    }

    fn run_sample(&self, args: &SampleArgs) -> Result<()> {
        let report = SampleUseCase::new(args.into()).execute::<CliBackend>(&Default::default())?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_summary(s: &WalkbackSummary) {
    println!("Walk-back dataset");
    println!("  base samples : {} × {}", s.samples, s.dim);
    println!("  batches      : {} (batch_size {}, last {})", s.num_batches, s.batch_size, s.last_batch_size);
    println!("  chain length : {}", s.chain_len);
    println!("  items        : {}", s.len);
    println!();
    println!("  {:>8}  {:>12}  {:>12}", "position", "mse", "mean");
    for m in &s.metrics {
        println!("  {:>8}  {:>12.6}  {:>12.6}", m.position, m.mse, m.mean);
    }
}

fn print_report(r: &SampleReport) {
    println!("Stochastic layers ({} rows, latent dim {})", r.rows, r.latent_dim);
    println!("  categorical one-hot rows : {}/{}", r.categorical_one_hot, r.rows);
    println!("  gumbel max |row sum - 1| : {:.2e}", r.gumbel_row_sum_err);
    if let Some(n) = r.gumbel_one_hot {
        println!("  gumbel one-hot rows      : {}/{}", n, r.rows);
    }
    println!("  gaussian mean KL         : {:.6}", r.gaussian_mean_kl);
    println!("  gaussian sample mean     : {:.6}", r.gaussian_mean);
}
