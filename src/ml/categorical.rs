// ============================================================
// Layer 5 — Categorical Straight-Through Sampler
// ============================================================
// Draws one category per row and returns its embedding, while
// letting gradients flow as if the output were the softmax
// probabilities:
//
//   sample = embed(k) + probs - detach(probs),   k ~ softmax(logits)
//
// Forward value:  embed(k)          (probs - probs cancels exactly)
// Backward:       d sample = d probs (embed(k) and detach(probs)
//                                     carry no logit gradient)
//
// Logits of any shape are read as [rows, D] with D the latent
// dimension, so one call draws `numel / D` independent samples.
// The draw itself uses the Gumbel-max trick,
//   k = argmax(logits + g),  g ~ Gumbel(0, 1)
// which is an exact sample from softmax(logits).
//
// Reference: Bengio et al. (2013) Estimating or Propagating Gradients
//            Through Stochastic Neurons
//            Burn Book §3 (Autodiff: detach)

use burn::{
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
    tensor::activation::{log_softmax, softmax},
};

use crate::domain::{
    error::{WalkbackError, WalkbackResult},
    shape::LatentShape,
};
use crate::ml::{
    embed::{IndexEmbedding, OneHotEmbedding},
    ops::gumbel_noise_like,
};

const GUMBEL_EPS: f64 = 1e-10;

#[derive(Config, Debug)]
pub struct CategoricalStraightThroughConfig {
    /// Must be `(D,)`, D = number of categories
    pub latent_shape: LatentShape,

    /// Subtract logsumexp from the logits before the softmax
    #[config(default = false)]
    pub normalise: bool,

    /// Fixed one-hot embedding (true) or a learned D×D table (false)
    #[config(default = true)]
    pub onehot: bool,
}

impl CategoricalStraightThroughConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> WalkbackResult<CategoricalStraightThrough<B>> {
        let latent_dim = self.latent_shape.vector_dim()?;
        let embedding  = (!self.onehot).then(|| EmbeddingConfig::new(latent_dim, latent_dim).init(device));
        Ok(CategoricalStraightThrough {
            embedding,
            latent_dim,
            normalise: self.normalise,
        })
    }
}

#[derive(Module, Debug)]
pub struct CategoricalStraightThrough<B: Backend> {
    /// `None` means the fixed one-hot embedding
    pub embedding:  Option<Embedding<B>>,
    pub latent_dim: usize,
    pub normalise:  bool,
}

/// Output of [`CategoricalStraightThrough::forward`].
#[derive(Debug, Clone)]
pub struct CategoricalSample<B: Backend, const D: usize> {
    /// Straight-through sample, same shape as the input logits
    pub sample: Tensor<B, D>,

    /// Logits actually used (normalised if configured), shape: [rows, latent_dim]
    pub logits: Tensor<B, 2>,
}

impl<B: Backend> CategoricalStraightThrough<B> {
    pub fn forward<const D: usize>(&self, logits: Tensor<B, D>) -> WalkbackResult<CategoricalSample<B, D>> {
        let dims  = logits.dims();
        let numel = logits.shape().num_elements();
        if numel % self.latent_dim != 0 {
            return Err(WalkbackError::shape_mismatch(&[self.latent_dim], &dims));
        }
        let rows = numel / self.latent_dim;

        let logits = logits.reshape([rows, self.latent_dim]);
        let logits = if self.normalise {
            log_softmax(logits, 1)
        } else {
            logits
        };

        let probs = softmax(logits.clone(), 1);

        // Gumbel-max draw: one category per row, outside the graph
        let frozen = logits.clone().detach();
        let index  = (frozen.clone() + gumbel_noise_like(&frozen, GUMBEL_EPS)).argmax(1); // [rows, 1]

        let embedded = self.embed(index).reshape([rows, self.latent_dim]);
        let sample   = embedded + probs.clone() - probs.detach();

        Ok(CategoricalSample {
            sample: sample.reshape(dims),
            logits,
        })
    }

    fn embed(&self, index: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        match &self.embedding {
            Some(table) => table.embed(index),
            None => OneHotEmbedding::new(self.latent_dim).embed(index),
        }
    }
}
