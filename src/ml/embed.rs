// ============================================================
// Layer 5 — Index Embeddings
// ============================================================
// Maps category indices to vectors for the categorical sampler.
//
//   OneHotEmbedding    fixed, parameter-free: index k → e_k
//   burn::nn::Embedding learned D×D lookup table
//
// Both take [batch, seq] Int indices and return [batch, seq, D],
// the same signature Burn's Embedding::forward uses.

use burn::{nn::Embedding, prelude::*};

/// Anything that turns category indices into vectors.
pub trait IndexEmbedding<B: Backend> {
    /// indices: [batch, seq] → [batch, seq, dim]
    fn embed(&self, indices: Tensor<B, 2, Int>) -> Tensor<B, 3>;
}

/// Fixed one-hot table of `num_classes` categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHotEmbedding {
    pub num_classes: usize,
}

impl OneHotEmbedding {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }
}

impl<B: Backend> IndexEmbedding<B> for OneHotEmbedding {
    fn embed(&self, indices: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch, seq] = indices.dims();
        let device = indices.device();

        let flat  = indices.reshape([batch * seq, 1]);
        let ones  = Tensor::ones([batch * seq, 1], &device);
        let table = Tensor::zeros([batch * seq, self.num_classes], &device).scatter(1, flat, ones);

        table.reshape([batch, seq, self.num_classes])
    }
}

impl<B: Backend> IndexEmbedding<B> for Embedding<B> {
    fn embed(&self, indices: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.forward(indices)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::nn::EmbeddingConfig;

    type TestBackend = NdArray;

    #[test]
    fn test_one_hot_embedding() {
        let device  = Default::default();
        let indices = Tensor::<TestBackend, 1, Int>::from_ints([1, 3].as_slice(), &device).reshape([2, 1]);
        let out     = IndexEmbedding::<TestBackend>::embed(&OneHotEmbedding::new(4), indices);
        assert_eq!(out.dims(), [2, 1, 4]);
        let values: Vec<f32> = out.into_data().to_vec().unwrap();
        assert_eq!(values, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_learned_embedding_shape() {
        let device  = Default::default();
        let table   = EmbeddingConfig::new(5, 5).init::<TestBackend>(&device);
        let indices = Tensor::<TestBackend, 1, Int>::from_ints([0, 4, 2].as_slice(), &device).reshape([3, 1]);
        assert_eq!(table.embed(indices).dims(), [3, 1, 5]);
    }
}
