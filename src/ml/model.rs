use burn::{
    nn::{LayerNorm, LayerNormConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::gelu,
};

use crate::domain::traits::StepFunction;

#[derive(Config, Debug)]
pub struct DenoiserConfig {
    pub input_dim:  usize,
    pub hidden_dim: usize,
}

impl DenoiserConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Denoiser<B> {
        Denoiser {
            norm:   LayerNormConfig::new(self.input_dim).init(device),
            hidden: LinearConfig::new(self.input_dim, self.hidden_dim).init(device),
            output: LinearConfig::new(self.hidden_dim, self.input_dim).init(device),
        }
    }
}

/// Residual MLP: `x + W2 · gelu(W1 · norm(x))`.
#[derive(Module, Debug)]
pub struct Denoiser<B: Backend> {
    pub norm:   LayerNorm<B>,
    pub hidden: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> Denoiser<B> {
    /// x: [..., input_dim] → [..., input_dim]
    pub fn forward<const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        let h = gelu(self.hidden.forward(self.norm.forward(x.clone())));
        x + self.output.forward(h)
    }
}

impl<B: Backend> StepFunction<B> for Denoiser<B> {
    fn step<const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        self.forward(x)
    }
}
