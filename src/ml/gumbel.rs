// ============================================================
// Layer 5 — Gumbel-Softmax (Concrete) Relaxation
// ============================================================
// A differentiable stand-in for sampling a categorical:
//
//   y = softmax((logits + g) / tau),   g ~ Gumbel(0, 1)
//
// Small tau pushes y towards one-hot, large tau towards uniform.
// With `hard`, the forward value is the one-hot of argmax(y) but
// the gradient is that of the soft y (straight-through):
//
//   y_hard - detach(y) + y
//
// Distributions lie along the last axis. The input is viewed as
// [rows, last] for the computation and reshaped back afterwards,
// so `dim` refers to that 2-D view (-1 / 1 across categories).
//
// Reference: Jang et al. (2017) Categorical Reparameterization
//            with Gumbel-Softmax
//            Maddison et al. (2017) The Concrete Distribution

use burn::{prelude::*, tensor::activation::softmax};

use crate::domain::error::{WalkbackError, WalkbackResult};
use crate::ml::ops::{gumbel_noise_like, one_hot_along};

#[derive(Config, Debug)]
pub struct GumbelSoftmaxConfig {
    /// Temperature, must be > 0
    #[config(default = 1.0)]
    pub tau: f64,

    /// Straight-through one-hot rounding
    #[config(default = false)]
    pub hard: bool,

    /// Floor inside the logs of the Gumbel noise
    #[config(default = 1e-10)]
    pub eps: f64,

    /// Softmax axis of the flattened [rows, last] view
    #[config(default = "-1")]
    pub dim: i64,
}

impl GumbelSoftmaxConfig {
    pub fn init(&self) -> WalkbackResult<GumbelSoftmax> {
        if !(self.tau > 0.0) {
            return Err(WalkbackError::invalid_config(format!("tau must be > 0, got {}", self.tau)));
        }
        if !(self.eps >= 0.0) {
            return Err(WalkbackError::invalid_config(format!("eps must be >= 0, got {}", self.eps)));
        }
        let dim = match self.dim {
            -2 | 0 => 0,
            -1 | 1 => 1,
            other => {
                return Err(WalkbackError::invalid_config(format!(
                    "dim {other} is out of range for the flattened [rows, categories] view"
                )))
            }
        };
        Ok(GumbelSoftmax {
            tau:  self.tau,
            hard: self.hard,
            eps:  self.eps,
            dim,
        })
    }
}

/// Parameter-free; holds only its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GumbelSoftmax {
    tau:  f64,
    hard: bool,
    eps:  f64,
    dim:  usize,
}

impl GumbelSoftmax {
    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn is_hard(&self) -> bool {
        self.hard
    }

    pub fn forward<B: Backend, const D: usize>(&self, logits: Tensor<B, D>) -> Tensor<B, D> {
        let noise = gumbel_noise_like(&logits, self.eps);
        self.forward_with_noise(logits, noise)
    }

    /// [`forward`](Self::forward) with caller-supplied Gumbel noise of the
    /// same shape as `logits`.
    pub fn forward_with_noise<B: Backend, const D: usize>(
        &self,
        logits: Tensor<B, D>,
        noise:  Tensor<B, D>,
    ) -> Tensor<B, D> {
        let dims   = logits.dims();
        let last   = dims[D - 1];
        let rows   = logits.shape().num_elements() / last.max(1);
        let device = logits.device();

        let logits = logits.reshape([rows, last]);
        let noise  = noise.detach().reshape([rows, last]);
        let y_soft = softmax((logits + noise).div_scalar(self.tau), self.dim);

        let y = if self.hard {
            let index  = y_soft.clone().argmax(self.dim);
            let y_hard = one_hot_along(index, [rows, last], self.dim, &device);
            y_hard - y_soft.clone().detach() + y_soft
        } else {
            y_soft
        };

        y.reshape(dims)
    }
}
