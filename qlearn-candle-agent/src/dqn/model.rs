use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::{InDim, OutDim},
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::trace;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<C> {
    pub(super) q_config: Option<C>,
    #[serde(default)]
    pub(super) opt_config: OptimizerConfig,
}

impl<C> Default for DqnModelConfig<C> {
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<C> DqnModelConfig<C> {
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: C) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }
}

impl<C> DqnModelConfig<C>
where
    C: InDim + OutDim,
{
    /// Sets input dimension of the model.
    pub fn in_dim(mut self, v: usize) -> Self {
        if let Some(q_config) = &mut self.q_config {
            q_config.set_in_dim(v);
        }
        self
    }

    /// Sets output dimension of the model.
    pub fn out_dim(mut self, v: usize) -> Self {
        if let Some(q_config) = &mut self.q_config {
            q_config.set_out_dim(v);
        }
        self
    }
}

impl<C> DqnModelConfig<C>
where
    C: Serialize + for<'de> Deserialize<'de>,
{
    /// Constructs [`DqnModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value function with its own [`VarMap`] and optimizer.
///
/// A target network is built with [`DqnModel::build_target`] and has no
/// optimizer; its parameters only change by copying or tracking.
pub struct DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    varmap: VarMap,

    // Action-value function
    q: Q,

    opt: Option<Optimizer>,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    fn build_q(q_config: Option<Q::Config>, device: &Device) -> Result<(VarMap, Q)> {
        let q_config = q_config.context("q_config is not set.")?;
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
            Q::build(vb, q_config)?
        };
        Ok((varmap, q))
    }

    /// Constructs [`DqnModel`].
    pub fn build(config: DqnModelConfig<Q::Config>, device: &Device) -> Result<Self> {
        let (varmap, q) = Self::build_q(config.q_config, device)?;
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            varmap,
            q,
            opt: Some(opt),
        })
    }

    /// Constructs [`DqnModel`] without optimizer.
    pub fn build_target(config: DqnModelConfig<Q::Config>, device: &Device) -> Result<Self> {
        let (varmap, q) = Self::build_q(config.q_config, device)?;

        Ok(Self {
            varmap,
            q,
            opt: None,
        })
    }

    /// Returns `true` if the model has an optimizer.
    pub fn has_optimizer(&self) -> bool {
        self.opt.is_some()
    }

    /// Outputs the action-value given observation(s).
    pub fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        self.q.forward(obs)
    }

    /// Computes gradients of `loss` and updates the parameters.
    ///
    /// With `clip_grad_value`, each element of the gradients is clamped into
    /// `[-clip_grad_value, clip_grad_value]` before the update.
    ///
    /// Fails if the model was built without optimizer.
    pub fn backward_step(&mut self, loss: &Tensor, clip_grad_value: Option<f64>) -> Result<()> {
        let opt = self
            .opt
            .as_mut()
            .context("backward_step on a model without optimizer")?;
        let mut grads = loss.backward()?;

        if let Some(c) = clip_grad_value {
            trace!("Clip gradients into [{}, {}]", -c, c);
            for var in self.varmap.all_vars() {
                if let Some(g) = grads.remove(&var) {
                    grads.insert(&var, g.clamp(-c, c)?);
                }
            }
        }

        opt.step(&grads)
    }

    /// Returns the [`VarMap`] holding the parameters.
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }
}
