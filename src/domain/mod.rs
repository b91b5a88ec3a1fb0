// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   shape.rs  — LatentShape, the canonical form of a shape spec
//   error.rs  — WalkbackError, the one error type of the core
//   traits.rs — Corruption and StepFunction, the two collaborators
//               of the walk-back chain
//
// Rules for this layer:
//   - NO tensor arithmetic beyond trait signatures
//   - NO file I/O
//   - NO logging
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling), §10 (Traits)

/// Canonical latent shapes (scalar or sequence → tuple)
pub mod shape;

/// The error taxonomy of the core
pub mod error;

/// Core abstractions (traits) that other layers implement
pub mod traits;
