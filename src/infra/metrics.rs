// ============================================================
// Layer 6 — Chain Metrics
// ============================================================
// Summarises how far each walk-back position drifts from the
// clean data, and records it to CSV.
//
// Metrics recorded per chain position:
//   - position: 0 is the identity pair, 1 the first corruption, ...
//   - mse:      mean squared distance to the original sample
//   - mean:     mean value of the chain element
//
// Both are element-weighted over every batch, so a short last
// batch counts exactly as much as its size.
//
// Output file: <dir>/chain_metrics.csv
//
// Example CSV output:
//   position,mse,mean
//   0,0.000000,0.481200
//   1,0.010300,0.480900
//   2,0.018750,0.472100
//   ...
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use burn::{prelude::*, tensor::ElementConversion};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::data::dataset::WalkbackDataset;

/// One row of metrics for a single chain position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainStepMetrics {
    pub position: usize,

    /// Mean of (chain element - original)² over all stored values
    pub mse: f64,

    /// Mean of the chain element over all stored values
    pub mean: f64,
}

/// Per-position statistics over every batch of `dataset`.
pub fn chain_step_mse<B: Backend, const D: usize>(dataset: &WalkbackDataset<B, D>) -> Vec<ChainStepMetrics> {
    let mut sq_err = vec![0.0_f64; dataset.chain_len()];
    let mut total  = vec![0.0_f64; dataset.chain_len()];
    let mut count  = 0_usize;

    for record in dataset.records() {
        count += record.original.shape().num_elements();
        for (c, x) in record.chain.iter().enumerate() {
            let diff = x.clone() - record.original.clone();
            sq_err[c] += (diff.clone() * diff).sum().into_scalar().elem::<f64>();
            total[c]  += x.clone().sum().into_scalar().elem::<f64>();
        }
    }

    let n = count.max(1) as f64;
    sq_err
        .into_iter()
        .zip(total)
        .enumerate()
        .map(|(position, (se, sum))| ChainStepMetrics {
            position,
            mse:  se / n,
            mean: sum / n,
        })
        .collect()
}

/// Appends chain metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("chain_metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "position,mse,mean")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, rows: &[ChainStepMetrics]) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        for m in rows {
            writeln!(f, "{},{:.6},{:.6}", m.position, m.mse, m.mean)?;
        }

        tracing::debug!("Logged {} chain positions to '{}'", rows.len(), self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
