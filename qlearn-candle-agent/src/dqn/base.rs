//! DQN agent implemented with candle.
use super::{
    config::{DqnConfig, TargetSync},
    explorer::{greedy, EpsilonGreedy},
    model::DqnModel,
};
use crate::{
    model::SubModel1,
    util::{copy_params, smooth_l1_loss, track, CriticLoss},
};
use anyhow::Result;
use candle_core::{shape::D, Device, Tensor};
use candle_nn::loss::mse;
use log::{debug, info};
use qlearn_core::{
    error::QlearnError,
    record::{Record, RecordValue},
    replay_buffer::Transition,
    Agent, Configurable, Env, Policy, ReplayBufferBase,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

type TransitionOf<E> = Transition<<E as Env>::Obs, <E as Env>::Act>;

/// Tensors of a batch of transitions.
struct TensorBatch {
    obs: Tensor,
    act: Tensor,
    next_obs: Tensor,
    reward: Tensor,
    /// `0` for terminal transitions, `1` otherwise.
    is_not_terminal: Tensor,
}

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The replay buffer must produce batches of [`Transition`]s.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = Vec<TransitionOf<E>>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + Clone,
{
    pub(in crate::dqn) target_sync: TargetSync,
    pub(in crate::dqn) sync_interval: usize,
    pub(in crate::dqn) batch_size: usize,
    pub(in crate::dqn) qnet: DqnModel<Q>,
    pub(in crate::dqn) qnet_tgt: DqnModel<Q>,
    pub(in crate::dqn) train: bool,
    pub(in crate::dqn) phantom: PhantomData<(E, R)>,
    pub(in crate::dqn) discount_factor: f64,
    pub(in crate::dqn) explorer: EpsilonGreedy,
    pub(in crate::dqn) device: Device,
    pub(in crate::dqn) n_opts: usize,
    pub(in crate::dqn) critic_loss: CriticLoss,
    pub(in crate::dqn) clip_grad_value: Option<f64>,
    rng: SmallRng,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = Vec<TransitionOf<E>>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + Clone,
{
    /// Constructs DQN agent on the given device.
    ///
    /// The target network is initialized with a copy of the policy network.
    pub fn build_with_device(config: DqnConfig<Q::Config>, device: Device) -> Result<Self> {
        config.validate()?;
        let qnet = DqnModel::build(config.model_config.clone(), &device)?;
        let qnet_tgt = DqnModel::build_target(config.model_config, &device)?;
        copy_params(qnet_tgt.varmap(), qnet.varmap())?;
        info!(
            "DQN agent: batch_size = {}, discount_factor = {}, target_sync = {:?}",
            config.batch_size, config.discount_factor, config.target_sync
        );

        Ok(Dqn {
            qnet,
            qnet_tgt,
            target_sync: config.target_sync,
            sync_interval: config.sync_interval,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            train: false,
            explorer: config.explorer,
            device,
            n_opts: 0,
            critic_loss: config.critic_loss,
            clip_grad_value: config.clip_grad_value,
            phantom: PhantomData,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Returns the policy network.
    pub fn qnet(&self) -> &DqnModel<Q> {
        &self.qnet
    }

    /// Returns the target network.
    pub fn qnet_tgt(&self) -> &DqnModel<Q> {
        &self.qnet_tgt
    }

    /// Returns the current value of epsilon of the explorer.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon()
    }

    /// Stacks observations into a tensor of shape `(n, obs_dim)`.
    fn obs_to_tensor<'a>(&self, obs: impl Iterator<Item = &'a E::Obs>) -> Result<Tensor>
    where
        E::Obs: 'a,
    {
        let mut n = 0;
        let flat = obs
            .flat_map(|o| {
                n += 1;
                Into::<Vec<f32>>::into(o.clone())
            })
            .collect::<Vec<_>>();
        let dim = flat.len() / n.max(1);
        Ok(Tensor::from_vec(flat, (n, dim), &self.device)?)
    }

    fn to_tensor_batch(&self, batch: &[TransitionOf<E>]) -> Result<TensorBatch> {
        let n = batch.len();
        let obs = self.obs_to_tensor(batch.iter().map(|t| t.state()))?;
        // The state stands in for the missing next state of a terminal
        // transition, its value is masked out in the TD target.
        let next_obs = self.obs_to_tensor(
            batch
                .iter()
                .map(|t| t.next_state().unwrap_or_else(|| t.state())),
        )?;
        let act = batch
            .iter()
            .map(|t| Into::<usize>::into(t.action().clone()) as u32)
            .collect::<Vec<_>>();
        let act = Tensor::from_vec(act, (n, 1), &self.device)?;
        let reward = batch.iter().map(|t| t.reward()).collect::<Vec<_>>();
        let reward = Tensor::from_vec(reward, (n,), &self.device)?;
        let is_not_terminal = batch
            .iter()
            .map(|t| if t.is_terminal() { 0f32 } else { 1f32 })
            .collect::<Vec<_>>();
        let is_not_terminal = Tensor::from_vec(is_not_terminal, (n,), &self.device)?;

        Ok(TensorBatch {
            obs,
            act,
            next_obs,
            reward,
            is_not_terminal,
        })
    }

    /// TD target `r + γ max_a' Q_tgt(s', a')`, or `r` for terminal transitions.
    fn td_target(&self, batch: &TensorBatch) -> Result<Tensor> {
        let q_next = self.qnet_tgt.forward(&batch.next_obs)?.max(D::Minus1)?;
        let q_next = ((q_next * &batch.is_not_terminal)? * self.discount_factor)?;
        Ok((&batch.reward + q_next)?.detach())
    }

    fn update_critic(&mut self, batch: Vec<TransitionOf<E>>) -> Result<f32> {
        let batch = self.to_tensor_batch(&batch)?;
        let pred = self
            .qnet
            .forward(&batch.obs)?
            .gather(&batch.act, D::Minus1)?
            .squeeze(D::Minus1)?;
        let tgt = self.td_target(&batch)?;

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };

        self.qnet.backward_step(&loss, self.clip_grad_value)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn sync_target(&mut self) -> Result<()> {
        match self.target_sync {
            TargetSync::Hard => {
                debug!("Hard update of the target network at {}", self.n_opts);
                copy_params(self.qnet_tgt.varmap(), self.qnet.varmap())
            }
            TargetSync::Soft { tau } => track(self.qnet_tgt.varmap(), self.qnet.varmap(), tau),
        }
    }

    fn opt_(&mut self, batch: Vec<TransitionOf<E>>) -> Result<Record> {
        let loss = self.update_critic(batch)?;
        self.n_opts += 1;

        if self.n_opts % self.sync_interval == 0 {
            self.sync_target()?;
        }

        Ok(Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            ("epsilon", RecordValue::Scalar(self.explorer.epsilon() as f32)),
        ]))
    }
}

impl<E, Q, R> Configurable for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = Vec<TransitionOf<E>>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + Clone,
{
    type Config = DqnConfig<Q::Config>;

    /// Constructs DQN agent, resolving the device given in the configuration.
    fn build(config: Self::Config) -> Result<Self> {
        let device = config.device.resolve()?;
        Self::build_with_device(config, device)
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = Vec<TransitionOf<E>>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + Clone,
{
    /// Epsilon-greedy in training mode, greedy in evaluation mode.
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let obs = self.obs_to_tensor(std::iter::once(obs))?;
        let a = self.qnet.forward(&obs)?;
        let a = match self.train {
            true => self.explorer.action(&a, &mut self.rng)?,
            false => greedy(&a)?,
        };
        Ok(a.into())
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = Vec<TransitionOf<E>>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: From<usize> + Into<usize>,
    Q::Config: DeserializeOwned + Serialize + Clone,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    /// Skips the step while the buffer holds fewer transitions than a batch.
    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>> {
        match buffer.batch(self.batch_size) {
            Ok(batch) => Ok(Some(self.opt_(batch)?)),
            Err(QlearnError::InsufficientData { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
