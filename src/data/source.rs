// ============================================================
// Layer 4 — Sequential Batching of a Base Collection
// ============================================================
// The flat index arithmetic of WalkbackDataset only works when
// batches come out in a fixed order, all of them full except
// possibly the last one. So there is no shuffling and no
// dropping of the incomplete tail here.
//
// Example with len=5, batch_size=2:
//   [0..2] [2..4] [4..5]
//
// Two kinds of base collection are supported:
//   - a raw tensor, batched by slicing its leading axis
//   - any Burn Dataset, batched through a Burn Batcher

use std::ops::Range;

use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    prelude::*,
};

use crate::domain::error::WalkbackError;

/// Consecutive `[start, end)` windows of at most `batch_size` over `[0, len)`.
///
/// # Panics
/// Panics if `batch_size` is 0 (the configuration layer rejects it first).
pub fn batch_ranges(len: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    assert!(batch_size > 0, "batch_size must be positive");
    (0..len)
        .step_by(batch_size)
        .map(move |start| start..(start + batch_size).min(len))
}

/// Batches of a raw tensor collection, sliced along dim 0.
pub fn tensor_batches<B: Backend, const D: usize>(
    x:          Tensor<B, D>,
    batch_size: usize,
) -> impl Iterator<Item = Result<Tensor<B, D>, WalkbackError>> {
    let len = x.dims()[0];
    batch_ranges(len, batch_size)
        .map(move |range| -> Result<Tensor<B, D>, WalkbackError> { Ok(x.clone().slice([range])) })
}

/// Batches of a Burn dataset, stacked by `batcher`.
pub fn dataset_batches<'a, I, B, const D: usize, DS, BT>(
    dataset:    &'a DS,
    batcher:    &'a BT,
    batch_size: usize,
) -> impl Iterator<Item = Result<Tensor<B, D>, WalkbackError>> + 'a
where
    I: 'a,
    B: Backend,
    DS: Dataset<I>,
    BT: Batcher<I, Tensor<B, D>>,
{
    batch_ranges(dataset.len(), batch_size).map(move |range| -> Result<Tensor<B, D>, WalkbackError> {
        let items = range
            .map(|i| dataset.get(i).ok_or(WalkbackError::MissingItem(i)))
            .collect::<Result<Vec<I>, _>>()?;
        Ok(batcher.batch(items))
    })
}
