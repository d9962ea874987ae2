//! Configuration of DQN agent.
use super::{explorer::EpsilonGreedy, DqnModelConfig};
use crate::{
    util::{CriticLoss, InDim, OutDim},
    Device,
};
use anyhow::Result;
use log::info;
use qlearn_core::error::QlearnError;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// How the target network follows the policy network.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub enum TargetSync {
    /// Copies the parameters.
    Hard,

    /// Exponential moving average, `θ' ← τ θ + (1 - τ) θ'`.
    Soft {
        /// Soft update coefficient.
        tau: f64,
    },
}

impl Default for TargetSync {
    fn default() -> Self {
        Self::Soft { tau: 0.005 }
    }
}

/// Configuration of [`Dqn`](super::Dqn).
///
/// `C` is the configuration of the action-value network.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnConfig<C> {
    pub(super) model_config: DqnModelConfig<C>,
    pub(super) target_sync: TargetSync,
    /// Interval of target synchronization in optimization steps.
    pub(super) sync_interval: usize,
    pub(super) batch_size: usize,
    pub(super) discount_factor: f64,
    pub(super) explorer: EpsilonGreedy,
    #[serde(default)]
    pub(super) critic_loss: CriticLoss,
    /// Gradients are clipped element-wise into `[-v, v]`.
    #[serde(default)]
    pub(super) clip_grad_value: Option<f64>,
    #[serde(default)]
    pub device: Device,
    pub(super) seed: u64,
}

impl<C> Default for DqnConfig<C> {
    /// Constructs DQN config with the hyperparameters for CartPole.
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            target_sync: TargetSync::default(),
            sync_interval: 1,
            batch_size: 128,
            discount_factor: 0.99,
            explorer: EpsilonGreedy::default(),
            critic_loss: CriticLoss::SmoothL1,
            clip_grad_value: Some(100.0),
            device: Device::Auto,
            seed: 42,
        }
    }
}

impl<C> DqnConfig<C> {
    /// Sets how the target network is synchronized.
    pub fn target_sync(mut self, v: TargetSync) -> Self {
        self.target_sync = v;
        self
    }

    /// Sets the interval of target synchronization in optimization steps.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Critic loss.
    pub fn critic_loss(mut self, v: CriticLoss) -> Self {
        self.critic_loss = v;
        self
    }

    /// Gradient clipping by value. `None` disables clipping.
    pub fn clip_grad_value(mut self, v: Option<f64>) -> Self {
        self.clip_grad_value = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<C>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Seed of the random number generator used for exploration.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the ranges of the hyperparameters.
    pub fn validate(&self) -> Result<(), QlearnError> {
        let invalid = |msg: String| Err(QlearnError::InvalidConfig(msg));

        if self.batch_size == 0 {
            return invalid("batch_size must be positive".into());
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return invalid(format!(
                "discount_factor must be in [0, 1), got {}",
                self.discount_factor
            ));
        }
        if self.sync_interval == 0 {
            return invalid("sync_interval must be positive".into());
        }
        if let TargetSync::Soft { tau } = self.target_sync {
            if !(tau > 0.0 && tau <= 1.0) {
                return invalid(format!("tau must be in (0, 1], got {}", tau));
            }
        }
        if let Some(v) = self.clip_grad_value {
            if v <= 0.0 {
                return invalid(format!("clip_grad_value must be positive, got {}", v));
            }
        }
        if self.model_config.q_config.is_none() {
            return invalid("q_config is not set".into());
        }
        Ok(())
    }
}

impl<C> DqnConfig<C>
where
    C: InDim + OutDim,
{
    /// Sets the input dimension of the action-value network.
    pub fn in_dim(mut self, v: usize) -> Self {
        self.model_config = self.model_config.in_dim(v);
        self
    }

    /// Sets the output dimension of the action-value network.
    pub fn out_dim(mut self, v: usize) -> Self {
        self.model_config = self.model_config.out_dim(v);
        self
    }
}

impl<C> DqnConfig<C>
where
    C: Serialize + for<'de> Deserialize<'de>,
{
    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DQN agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DQN agent into {}", path_.display());
        Ok(())
    }
}
