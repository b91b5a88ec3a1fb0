// ============================================================
// Layer 5 — Stochastic Layer Family
// ============================================================
// One entry point over the three samplers. Each variant takes its
// own parameter kind and reports its own statistics:
//
//   variant       params          statistics
//   ───────────   ─────────────   ─────────────────────
//   Categorical   Logits          Logits  [rows, D]
//   Gumbel        Logits          None
//   Gaussian      Gaussian        Gaussian{mu, logvar}
//
// Handing a layer the wrong parameter kind is a contract
// violation, never a silent reinterpretation.

use burn::prelude::*;

use crate::domain::error::{WalkbackError, WalkbackResult};
use crate::ml::{
    categorical::CategoricalStraightThrough,
    gaussian::DiagonalGaussian,
    gumbel::GumbelSoftmax,
};

#[derive(Debug, Clone)]
pub enum StochasticLayer<B: Backend> {
    Categorical(CategoricalStraightThrough<B>),
    Gumbel(GumbelSoftmax),
    Gaussian(DiagonalGaussian),
}

#[derive(Debug, Clone)]
pub enum DistributionParams<B: Backend, const D: usize> {
    Logits(Tensor<B, D>),
    Gaussian { mu: Tensor<B, D>, logvar: Tensor<B, D> },
}

impl<B: Backend, const D: usize> DistributionParams<B, D> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Logits(_) => "logits",
            Self::Gaussian { .. } => "gaussian",
        }
    }
}

#[derive(Debug, Clone)]
pub enum SampleStatistics<B: Backend> {
    Logits(Tensor<B, 2>),
    Gaussian { mu: Tensor<B, 2>, logvar: Tensor<B, 2> },
    None,
}

#[derive(Debug, Clone)]
pub struct StochasticSample<B: Backend, const D: usize> {
    pub sample:     Tensor<B, D>,
    pub statistics: SampleStatistics<B>,
}

impl<B: Backend> StochasticLayer<B> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Categorical(_) => "categorical",
            Self::Gumbel(_) => "gumbel",
            Self::Gaussian(_) => "gaussian",
        }
    }

    pub fn sample<const D: usize>(&self, params: DistributionParams<B, D>) -> WalkbackResult<StochasticSample<B, D>> {
        match (self, params) {
            (Self::Categorical(layer), DistributionParams::Logits(logits)) => {
                let out = layer.forward(logits)?;
                Ok(StochasticSample {
                    sample:     out.sample,
                    statistics: SampleStatistics::Logits(out.logits),
                })
            }
            (Self::Gumbel(layer), DistributionParams::Logits(logits)) => Ok(StochasticSample {
                sample:     layer.forward(logits),
                statistics: SampleStatistics::None,
            }),
            (Self::Gaussian(layer), DistributionParams::Gaussian { mu, logvar }) => {
                let out = layer.forward(mu, logvar)?;
                Ok(StochasticSample {
                    sample:     out.sample,
                    statistics: SampleStatistics::Gaussian { mu: out.mu, logvar: out.logvar },
                })
            }
            (layer, params) => Err(WalkbackError::contract(format!(
                "{} layer cannot sample from {} parameters",
                layer.name(),
                params.kind()
            ))),
        }
    }
}

impl<B: Backend> From<CategoricalStraightThrough<B>> for StochasticLayer<B> {
    fn from(layer: CategoricalStraightThrough<B>) -> Self {
        Self::Categorical(layer)
    }
}

impl<B: Backend> From<GumbelSoftmax> for StochasticLayer<B> {
    fn from(layer: GumbelSoftmax) -> Self {
        Self::Gumbel(layer)
    }
}

impl<B: Backend> From<DiagonalGaussian> for StochasticLayer<B> {
    fn from(layer: DiagonalGaussian) -> Self {
        Self::Gaussian(layer)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shape::as_shape;
    use crate::ml::{
        categorical::CategoricalStraightThroughConfig,
        gaussian::DiagonalGaussianConfig,
        gumbel::GumbelSoftmaxConfig,
    };
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn layers() -> Vec<StochasticLayer<TestBackend>> {
        let device = Default::default();
        vec![
            CategoricalStraightThroughConfig::new(as_shape(4))
                .init::<TestBackend>(&device)
                .unwrap()
                .into(),
            GumbelSoftmaxConfig::new().init().unwrap().into(),
            DiagonalGaussianConfig::new(as_shape(4)).init().unwrap().into(),
        ]
    }

    fn zeros() -> Tensor<TestBackend, 3> {
        Tensor::zeros([2, 3, 4], &Default::default())
    }

    #[test]
    fn test_each_layer_reports_its_own_statistics() {
        let [categorical, gumbel, gaussian]: [StochasticLayer<TestBackend>; 3] =
            layers().try_into().unwrap();

        let out = categorical.sample(DistributionParams::Logits(zeros())).unwrap();
        assert_eq!(out.sample.dims(), [2, 3, 4]);
        assert!(matches!(out.statistics, SampleStatistics::Logits(ref l) if l.dims() == [6, 4]));

        let out = gumbel.sample(DistributionParams::Logits(zeros())).unwrap();
        assert_eq!(out.sample.dims(), [2, 3, 4]);
        assert!(matches!(out.statistics, SampleStatistics::None));

        let out = gaussian
            .sample(DistributionParams::Gaussian { mu: zeros(), logvar: zeros() })
            .unwrap();
        assert_eq!(out.sample.dims(), [2, 3, 4]);
        assert!(matches!(out.statistics, SampleStatistics::Gaussian { ref mu, .. } if mu.dims() == [6, 4]));
    }

    #[test]
    fn test_wrong_parameter_kind_is_a_contract_violation() {
        for layer in layers() {
            let params = match layer {
                StochasticLayer::Gaussian(_) => DistributionParams::Logits(zeros()),
                _ => DistributionParams::Gaussian { mu: zeros(), logvar: zeros() },
            };
            let err = layer.sample(params);
            assert!(matches!(err, Err(WalkbackError::ContractViolation(_))), "{}", layer.name());
        }
    }
}
