//! Deep Q-network with experience replay on the cart-pole task.
//!
//! The workspace consists of the following crates:
//!
//! * Core and utility
//!   * `qlearn-core` provides traits generic to environments and agents, the
//!     replay memory, the episodic training loop and records of metrics.
//!   * `qlearn-tensorboard` has `TensorboardRecorder` struct to write records
//!     which can be shown in Tensorboard. It is based on
//!     [tensorboard-rs](https://crates.io/crates/tensorboard-rs).
//! * Environment
//!   * `qlearn-cartpole-env` is a native implementation of the classic
//!     cart-pole balancing task.
//! * Agent
//!   * `qlearn-candle-agent` includes the DQN agent based on
//!     [candle](https://crates.io/crates/candle-core).
//! * `qlearn` (this crate) wires them together and ships the `dqn_cartpole`
//!   binary.
//!
//! ```no_run
//! use qlearn::{config::DqnCartpoleConfig, train, evaluate};
//! use qlearn_core::record::LogRecorder;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DqnCartpoleConfig::default().n_episodes(50);
//! let device = config.agent_config.device.resolve()?;
//! let mut agent = train(&config, device, &mut LogRecorder::new())?;
//! let record = evaluate(&config, &mut agent)?;
//! println!("{:?}", record.get_scalar("eval_return")?);
//! # Ok(())
//! # }
//! ```
pub mod config;

use anyhow::Result;
use config::DqnCartpoleConfig;
use log::info;
use qlearn_candle_agent::{dqn::Dqn, mlp::Mlp};
use qlearn_cartpole_env::{CartPoleAct, CartPoleEnv, CartPoleObs};
use qlearn_core::{
    record::{AggregateRecorder, Record},
    replay_buffer::{ReplayMemory, Transition, TransitionProcessor, TransitionProcessorConfig},
    Agent as _, DefaultEvaluator, Env as _, Evaluator as _, ReplayBufferBase, StepProcessor,
    Trainer,
};

/// Environment.
pub type Env = CartPoleEnv;

/// Converts steps of [`Env`] into transitions.
pub type StepProc = TransitionProcessor<Env>;

/// Replay memory of cart-pole transitions.
pub type ReplayBuffer = ReplayMemory<Transition<CartPoleObs, CartPoleAct>>;

/// DQN agent with an MLP action-value function.
pub type DqnAgent = Dqn<Env, Mlp, ReplayBuffer>;

/// Evaluator running greedy episodes.
pub type Evaluator = DefaultEvaluator<Env>;

/// Seed of the evaluation environment, `config.seed + 1` wrapping on overflow.
pub fn eval_seed(config: &DqnCartpoleConfig) -> i64 {
    (config.seed as i64).wrapping_add(1)
}

/// Trains a DQN agent with the given configuration.
///
/// The input and output dimensions of the action-value function are taken
/// from the environment. Evaluation during training, if enabled, runs on a
/// separate environment seeded with `config.seed + 1`.
pub fn train(
    config: &DqnCartpoleConfig,
    device: candle_core::Device,
    recorder: &mut dyn AggregateRecorder,
) -> Result<DqnAgent> {
    let env = Env::build(&config.env_config, config.seed as i64)?;
    let agent_config = config
        .agent_config
        .clone()
        .in_dim(env.obs_dim())
        .out_dim(env.n_actions());
    let mut agent = DqnAgent::build_with_device(agent_config, device)?;
    let step_proc = StepProc::build(&TransitionProcessorConfig::default());
    let mut buffer = ReplayBuffer::build(&config.replay_buffer_config)?;
    let mut evaluator = Evaluator::new(
        &config.env_config,
        eval_seed(config),
        config.n_eval_episodes,
    )?
    .max_steps_per_episode(config.trainer_config.max_steps_per_episode);
    let mut trainer = Trainer::build(config.trainer_config.clone())?;

    info!("Start training for {} episodes", config.trainer_config.n_episodes);
    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        recorder,
        &mut evaluator,
    )?;

    Ok(agent)
}

/// Runs `config.n_eval_episodes` greedy episodes with the agent.
///
/// Episodes are capped at `config.trainer_config.max_steps_per_episode`.
///
/// The agent is left in evaluation mode.
pub fn evaluate(config: &DqnCartpoleConfig, agent: &mut DqnAgent) -> Result<Record> {
    let mut evaluator = Evaluator::new(
        &config.env_config,
        eval_seed(config),
        config.n_eval_episodes,
    )?
    .max_steps_per_episode(config.trainer_config.max_steps_per_episode);
    agent.eval();
    evaluator.evaluate(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlearn_core::Env as _;

    #[test]
    fn test_eval_seed_wraps() -> Result<()> {
        assert_eq!(eval_seed(&DqnCartpoleConfig::default().seed(41)), 42);
        assert_eq!(eval_seed(&DqnCartpoleConfig::default().seed(u64::MAX - 1)), -1);
        assert_eq!(eval_seed(&DqnCartpoleConfig::default().seed(u64::MAX)), 0);

        // the evaluation environment reseeds each episode from the wrapped seed
        let config = DqnCartpoleConfig::default().seed(u64::MAX - 1);
        let mut env = Env::build(&config.env_config, eval_seed(&config))?;
        for ix in 0..3 {
            env.reset_with_index(ix)?;
        }
        Ok(())
    }
}
