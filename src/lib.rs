//! Walk-back denoising datasets and stochastic sampling layers for Burn.
//!
//! - [`data::dataset::WalkbackDataset`] materialises a corruption chain
//!   over a base collection and exposes it as a flat Burn `Dataset`.
//! - [`ml::stochastic::StochasticLayer`] groups the categorical
//!   straight-through, Gumbel-softmax and diagonal Gaussian samplers.

#![recursion_limit = "256"]

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;
