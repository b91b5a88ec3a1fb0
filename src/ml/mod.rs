// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The differentiable building blocks.
//
// What's in this layer:
//
//   ops.rs         — Gumbel noise, one-hot scatter
//
//   embed.rs       — index → vector lookups
//                    • fixed one-hot table
//                    • learned burn::nn::Embedding
//
//   categorical.rs — categorical straight-through sampler
//   gumbel.rs      — Gumbel-softmax relaxation (soft or hard)
//   gaussian.rs    — diagonal Gaussian reparameterisation + KL
//
//   stochastic.rs  — the three samplers behind one enum
//
//   model.rs       — the residual MLP denoiser used as the
//                    walk-back step function by the CLI
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §3 (Autodiff)

pub mod ops;

/// Index embeddings used by the categorical sampler
pub mod embed;

pub mod categorical;
pub mod gumbel;
pub mod gaussian;

/// Closed family over the three samplers
pub mod stochastic;

/// MLP denoiser
pub mod model;
