// ============================================================
// Layer 4 — WalkbackDataset
// ============================================================
// Materialises the walk-back chain of an entire base collection
// up front, then exposes every (chain position × element) pair
// as one flat, randomly indexable Burn Dataset.
//
// Storage, per batch b of the base collection:
//
//   original_b   [size_b, ...]
//   chain_b[0]   original_b                     ← identity pair
//   chain_b[1]   corrupt(original_b)
//   chain_b[2]   corrupt(step(chain_b[1]))
//   ...
//   chain_b[n-1]                                 n = n_walkback + 2
//
// Flat index layout (batch-major, then chain position, then
// element), with the NOMINAL stride batch_size * n:
//
//   i → b = i / stride,  r = i % stride
//       c = r / size_b,  e = r % size_b
//       x = chain_b[c][e],  y = original_b[e]
//
// Only the last batch may be short. The lookup of size_b is kept
// in one place (batch_size_at) because the ragged tail is where
// this arithmetic goes wrong.
//
// Memory is O(n × dataset) and construction blocks until every
// chain is computed. get(i) is a pure slice of stored tensors.
//
// Reference: Burn Book §4 (Datasets)
//            Bengio et al. (2013) Generalized Denoising Auto-Encoders

use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    prelude::*,
};

use crate::data::{
    chain::generate_chain,
    source::{dataset_batches, tensor_batches},
};
use crate::domain::error::{WalkbackError, WalkbackResult};

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct WalkbackConfig {
    /// Number of corrupt(step(·)) applications after the first corruption
    #[config(default = 5)]
    pub n_walkback: usize,

    /// Number of base samples pushed through the step function at once
    #[config(default = 256)]
    pub batch_size: usize,
}

/// Where the step function runs and where the finished chain is stored.
#[derive(Clone, Debug)]
pub struct DevicePlacement<B: Backend> {
    pub model:   B::Device,
    pub storage: B::Device,
}

impl<B: Backend> DevicePlacement<B> {
    pub fn new(model: B::Device, storage: B::Device) -> Self {
        Self { model, storage }
    }

    /// Evaluate and store on the same device.
    pub fn single(device: B::Device) -> Self {
        Self { model: device.clone(), storage: device }
    }
}

impl WalkbackConfig {
    /// Chain positions per batch: the original plus the walk-back proper.
    pub fn chain_len(&self) -> usize {
        self.n_walkback + 2
    }

    fn validate(&self) -> WalkbackResult<()> {
        if self.batch_size == 0 {
            return Err(WalkbackError::invalid_config("batch_size must be positive"));
        }
        Ok(())
    }

    /// Build a walk-back dataset from a raw tensor whose leading axis
    /// indexes the base samples.
    ///
    /// `step` and `corrupt` only receive detached tensors, so no gradient
    /// is recorded across the chain.
    pub fn build<B, const D: usize, E, S, C>(
        &self,
        x:         Tensor<B, D>,
        step:      S,
        corrupt:   C,
        placement: &DevicePlacement<B>,
    ) -> Result<WalkbackDataset<B, D>, E>
    where
        B: Backend,
        E: From<WalkbackError>,
        S: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
        C: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
    {
        self.validate()?;
        let batches = tensor_batches(x, self.batch_size);
        WalkbackDataset::materialise(self, batches, step, corrupt, placement)
    }

    /// Build a walk-back dataset from a Burn dataset, read in index order
    /// and stacked by `batcher`. Gradients are not recorded, as for
    /// [`WalkbackConfig::build`].
    pub fn build_from_dataset<I, B, const D: usize, E, S, C, DS, BT>(
        &self,
        dataset:   &DS,
        batcher:   &BT,
        step:      S,
        corrupt:   C,
        placement: &DevicePlacement<B>,
    ) -> Result<WalkbackDataset<B, D>, E>
    where
        B: Backend,
        E: From<WalkbackError>,
        S: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
        C: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
        DS: Dataset<I>,
        BT: Batcher<I, Tensor<B, D>>,
    {
        self.validate()?;
        let batches = dataset_batches(dataset, batcher, self.batch_size);
        WalkbackDataset::materialise(self, batches, step, corrupt, placement)
    }
}

// ─── Stored records and items ─────────────────────────────────────────────────
/// One batch of the base collection and its full chain.
#[derive(Debug, Clone)]
pub struct WalkbackRecord<B: Backend, const D: usize> {
    /// Uncorrupted batch, shape: [size_b, ...]
    pub original: Tensor<B, D>,

    /// `chain[0]` is `original`; the rest is the walk-back proper
    pub chain: Vec<Tensor<B, D>>,
}

impl<B: Backend, const D: usize> WalkbackRecord<B, D> {
    pub fn batch_len(&self) -> usize {
        self.original.dims()[0]
    }
}

/// One (corrupted input, original target) training pair.
///
/// Both tensors keep a leading axis of size 1 so a list of items
/// stacks into a batch with a single `Tensor::cat` along dim 0.
#[derive(Debug, Clone)]
pub struct WalkbackItem<B: Backend, const D: usize> {
    /// `x`: element of the chain
    pub input: Tensor<B, D>,

    /// `y`: the original sample the chain started from
    pub target: Tensor<B, D>,
}

/// A flat index decomposed into record coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLocation {
    pub batch:          usize,
    pub chain_position: usize,
    pub element:        usize,
}

// ─── WalkbackDataset ──────────────────────────────────────────────────────────
#[derive(Debug)]
pub struct WalkbackDataset<B: Backend, const D: usize> {
    records:    Vec<WalkbackRecord<B, D>>,
    batch_size: usize,
    chain_len:  usize,
    len:        usize,
}

impl<B: Backend, const D: usize> WalkbackDataset<B, D> {
    fn materialise<E, S, C, It>(
        config:      &WalkbackConfig,
        batches:     It,
        mut step:    S,
        mut corrupt: C,
        placement:   &DevicePlacement<B>,
    ) -> Result<Self, E>
    where
        E: From<WalkbackError>,
        S: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
        C: FnMut(Tensor<B, D>) -> Result<Tensor<B, D>, E>,
        It: Iterator<Item = Result<Tensor<B, D>, WalkbackError>>,
    {
        let batch_size = config.batch_size;
        let chain_len  = config.chain_len();
        let mut records: Vec<WalkbackRecord<B, D>> = Vec::new();

        for batch in batches {
            let original = batch?.detach().to_device(&placement.storage);
            let size     = original.dims()[0];

            // Every batch but the last must be full, or the nominal
            // stride used by `locate` skips or aliases elements.
            if size == 0 || size > batch_size {
                return Err(WalkbackError::invalid_config(format!(
                    "batch {} has {size} elements, expected 1..={batch_size}",
                    records.len()
                ))
                .into());
            }
            if let Some(previous) = records.last() {
                if previous.batch_len() != batch_size {
                    return Err(WalkbackError::invalid_config(format!(
                        "batch {} has {} elements but is not the last batch",
                        records.len() - 1,
                        previous.batch_len()
                    ))
                    .into());
                }
            }

            let seed = original.clone().to_device(&placement.model);
            let walk = generate_chain(seed, &mut step, &mut corrupt, chain_len - 1)?;

            let mut chain = Vec::with_capacity(chain_len);
            chain.push(original.clone());
            chain.extend(walk.into_iter().map(|c| c.detach().to_device(&placement.storage)));

            tracing::debug!("Materialised walk-back chain for batch {} ({} elements)", records.len(), size);
            records.push(WalkbackRecord { original, chain });
        }

        let last = records.last().ok_or(WalkbackError::EmptyDataset)?;
        let len  = (records.len() - 1) * batch_size * chain_len + chain_len * last.batch_len();

        tracing::info!(
            "Walk-back dataset ready: {} batches, chain length {}, {} items",
            records.len(),
            chain_len,
            len
        );

        Ok(Self { records, batch_size, chain_len, len })
    }

    /// Number of (input, target) pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `n_walkback + 2`
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// The configured batch size (the nominal stride unit).
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_batches(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[WalkbackRecord<B, D>] {
        &self.records
    }

    /// Actual number of elements in batch `b`; smaller than
    /// `batch_size` only for the final batch.
    ///
    /// # Panics
    /// Panics if `b >= num_batches()`.
    pub fn batch_size_at(&self, b: usize) -> usize {
        self.records[b].batch_len()
    }

    /// Decompose a flat index into (batch, chain position, element).
    pub fn locate(&self, index: usize) -> WalkbackResult<ItemLocation> {
        if index >= self.len {
            return Err(WalkbackError::IndexOutOfRange { index, len: self.len });
        }

        let stride = self.batch_size * self.chain_len;
        let batch  = index / stride;
        let rem    = index % stride;

        let actual = self.batch_size_at(batch);

        Ok(ItemLocation {
            batch,
            chain_position: rem / actual,
            element:        rem % actual,
        })
    }

    /// The `index`-th (input, target) pair.
    pub fn item(&self, index: usize) -> WalkbackResult<WalkbackItem<B, D>> {
        let loc    = self.locate(index)?;
        let record = &self.records[loc.batch];
        let e      = loc.element;

        Ok(WalkbackItem {
            input:  record.chain[loc.chain_position].clone().slice([e..e + 1]),
            target: record.original.clone().slice([e..e + 1]),
        })
    }
}

impl<B: Backend, const D: usize> Dataset<WalkbackItem<B, D>> for WalkbackDataset<B, D> {
    fn get(&self, index: usize) -> Option<WalkbackItem<B, D>> {
        self.item(index).ok()
    }

    fn len(&self) -> usize {
        self.len
    }
}
