// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a base collection and training pairs.
//
// The pipeline flows in this order:
//
//   base collection (Tensor or Burn Dataset)
//       │
//       ▼
//   source            → fixed-order batches, ragged tail kept
//       │
//       ▼
//   chain             → corrupt, step, corrupt, step, ...
//       │             (uses a Corruption from corruption.rs)
//       ▼
//   WalkbackDataset   → stores every chain, flat index view
//       │
//       ▼
//   WalkbackBatcher   → stacks (input, target) pairs
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Walk-back chain generation for one seed batch
pub mod chain;

/// Fixed-order batching of a base collection
pub mod source;

/// The materialised walk-back dataset and its flat index
pub mod dataset;

/// Implements Burn's Batcher trait for rows and walk-back items
pub mod batcher;

/// Gaussian, masking and salt-and-pepper noise
pub mod corruption;
