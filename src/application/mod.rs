// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal per CLI command.
//
// Rules for this layer:
//   - No tensor math here (that's Layer 4 and 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Synthetic data → denoiser → walk-back dataset → metrics
pub mod build_use_case;

// Random parameters through every stochastic layer
pub mod sample_use_case;
