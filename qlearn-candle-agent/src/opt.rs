//! Optimizers.
use anyhow::Result;
use candle_core::{backprop::GradStore, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::{
    adam::{Adam, ParamsAdam},
    Decay,
};
use serde::{Deserialize, Serialize};

/// Configuration of optimizer for training neural networks in an RL agent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// AdamW optimizer of `candle-nn`.
    AdamW {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_beta1")]
        /// Coefficient for the running average of gradients.
        beta1: f64,
        #[serde(default = "default_beta2")]
        /// Coefficient for the running average of squared gradients.
        beta2: f64,
        #[serde(default = "default_eps")]
        /// Term added to the denominator for numerical stability.
        eps: f64,
        #[serde(default = "default_weight_decay")]
        /// Decoupled weight decay.
        weight_decay: f64,
    },

    /// Adam optimizer of `candle-optimisers`, supporting AMSGrad.
    ///
    /// With `weight_decay`, the decay is decoupled from the gradient as in AdamW.
    Adam {
        /// Learning rate.
        lr: f64,
        #[serde(default)]
        /// Use the AMSGrad variant.
        amsgrad: bool,
        #[serde(default)]
        /// Decoupled weight decay.
        weight_decay: Option<f64>,
    },
}

fn default_beta1() -> f64 {
    ParamsAdamW::default().beta1
}

fn default_beta2() -> f64 {
    ParamsAdamW::default().beta2
}

fn default_eps() -> f64 {
    ParamsAdamW::default().eps
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// Constructs an optimizer of the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    beta1: *beta1,
                    beta2: *beta2,
                    eps: *eps,
                    weight_decay: *weight_decay,
                };
                let opt = AdamW::new(vars, params)?;
                Ok(Optimizer::AdamW(opt))
            }
            OptimizerConfig::Adam {
                lr,
                amsgrad,
                weight_decay,
            } => {
                let params = ParamsAdam {
                    lr: *lr,
                    amsgrad: *amsgrad,
                    weight_decay: weight_decay.map(Decay::DecoupledWeightDecay),
                    ..ParamsAdam::default()
                };
                let opt = Adam::new(vars, params)?;
                Ok(Optimizer::Adam(opt))
            }
        }
    }

    /// Override learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::AdamW {
                lr: _,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => Self::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            },
            Self::Adam {
                lr: _,
                amsgrad,
                weight_decay,
            } => Self::Adam {
                lr,
                amsgrad,
                weight_decay,
            },
        }
    }
}

impl Default for OptimizerConfig {
    /// AdamW with AMSGrad, learning rate `1e-4` and weight decay `0.01`.
    fn default() -> Self {
        Self::Adam {
            lr: 1e-4,
            amsgrad: true,
            weight_decay: Some(0.01),
        }
    }
}

/// Optimizers.
///
/// This is a thin wrapper of optimizers implementing [`candle_nn::Optimizer`].
pub enum Optimizer {
    /// AdamW optimizer.
    AdamW(AdamW),

    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Updates the variables with the given gradients.
    pub fn step(&mut self, grads: &GradStore) -> Result<()> {
        match self {
            Self::AdamW(opt) => Ok(opt.step(grads)?),
            Self::Adam(opt) => Ok(opt.step(grads)?),
        }
    }
}
