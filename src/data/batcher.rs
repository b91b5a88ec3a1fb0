// ============================================================
// Layer 4 — Batchers
// ============================================================
// Two Burn Batcher implementations:
//
//   RowBatcher       Vec<Vec<f32>>            → Tensor [N, width]
//                    turns a plain row dataset into the batches
//                    the walk-back chain is computed on
//
//   WalkbackBatcher  Vec<WalkbackItem>        → WalkbackBatch
//                    stacks (input, target) pairs for training
//
// How stacking works here:
//   Every WalkbackItem already carries a leading axis of size 1,
//   so N items are joined with one Tensor::cat along dim 0:
//   [1, ...] × N → [N, ...]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::WalkbackItem;

// ─── WalkbackBatch ────────────────────────────────────────────────────────────
/// A batch of walk-back training pairs.
#[derive(Debug, Clone)]
pub struct WalkbackBatch<B: Backend, const D: usize> {
    /// Corrupted inputs, shape: [batch_size, ...]
    pub inputs: Tensor<B, D>,

    /// Original targets, shape: [batch_size, ...]
    pub targets: Tensor<B, D>,
}

// ─── WalkbackBatcher ──────────────────────────────────────────────────────────
/// Holds the target device so batches land where training runs.
#[derive(Clone, Debug)]
pub struct WalkbackBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WalkbackBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend, const D: usize> Batcher<WalkbackItem<B, D>, WalkbackBatch<B, D>> for WalkbackBatcher<B> {
    fn batch(&self, items: Vec<WalkbackItem<B, D>>) -> WalkbackBatch<B, D> {
        let (inputs, targets): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|item| (item.input, item.target))
            .unzip();

        WalkbackBatch {
            inputs:  Tensor::cat(inputs, 0).to_device(&self.device),
            targets: Tensor::cat(targets, 0).to_device(&self.device),
        }
    }
}

// ─── RowBatcher ───────────────────────────────────────────────────────────────
/// Stacks equal-width `f32` rows into a `[rows, width]` tensor.
#[derive(Clone, Debug)]
pub struct RowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> RowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<Vec<f32>, Tensor<B, 2>> for RowBatcher<B> {
    /// # Panics
    /// Panics if the rows do not all have the same width.
    fn batch(&self, items: Vec<Vec<f32>>) -> Tensor<B, 2> {
        let rows  = items.len();
        let width = items.first().map(Vec::len).unwrap_or(0);
        assert!(
            items.iter().all(|row| row.len() == width),
            "all rows in a batch must have width {width}"
        );

        let flat: Vec<f32> = items.into_iter().flatten().collect();
        Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device).reshape([rows, width])
    }
}
