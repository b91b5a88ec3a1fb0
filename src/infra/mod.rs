// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to the walk-back
// core or the stochastic layers:
//
//   metrics.rs — Chain metrics
//                Per-position drift of a materialised
//                walk-back dataset, appended to a CSV file
//                for later analysis and plotting.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Chain metrics and their CSV logger
pub mod metrics;
