//! Configuration of DQN training on the cart-pole task.
use anyhow::Result;
use log::info;
use qlearn_candle_agent::{
    dqn::{DqnConfig, DqnModelConfig, EpsilonGreedy, TargetSync},
    mlp::MlpConfig,
    opt::OptimizerConfig,
    util::CriticLoss,
};
use qlearn_cartpole_env::CartPoleConfig;
use qlearn_core::{replay_buffer::ReplayMemoryConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

const DIM_OBS: usize = 4;
const DIM_ACT: usize = 2;
const HIDDEN_UNITS: usize = 128;
const LR: f64 = 1e-4;
const DISCOUNT_FACTOR: f64 = 0.99;
const BATCH_SIZE: usize = 128;
const TAU: f64 = 0.005;
const CLIP_GRAD_VALUE: f64 = 100.0;
const REPLAY_MEMORY_CAPACITY: usize = 10000;
const N_EPISODES: usize = 600;
const EVAL_INTERVAL: usize = 50;
const FLUSH_RECORD_INTERVAL: usize = 10;
const N_EVAL_EPISODES: usize = 5;
const SEED: u64 = 42;

fn default_n_eval_episodes() -> usize {
    N_EVAL_EPISODES
}

fn default_seed() -> u64 {
    SEED
}

/// Configuration of the whole training run.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DqnCartpoleConfig {
    /// Environment.
    #[serde(default)]
    pub env_config: CartPoleConfig,

    /// Agent.
    pub agent_config: DqnConfig<MlpConfig>,

    /// Replay memory.
    #[serde(default)]
    pub replay_buffer_config: ReplayMemoryConfig,

    /// Training loop.
    #[serde(default)]
    pub trainer_config: TrainerConfig,

    /// Number of episodes per evaluation.
    #[serde(default = "default_n_eval_episodes")]
    pub n_eval_episodes: usize,

    /// Seed of the training environment.
    ///
    /// The evaluation environment uses `seed + 1`, wrapping on overflow. The
    /// agent and the replay memory keep the seeds of their own sections when
    /// loaded from YAML; [`DqnCartpoleConfig::seed`] sets all of them.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for DqnCartpoleConfig {
    fn default() -> Self {
        let mlp_config = MlpConfig::new(DIM_OBS, vec![HIDDEN_UNITS, HIDDEN_UNITS], DIM_ACT, false);
        let opt_config = OptimizerConfig::default().learning_rate(LR);
        let model_config = DqnModelConfig::default()
            .q_config(mlp_config)
            .opt_config(opt_config);
        let agent_config = DqnConfig::default()
            .model_config(model_config)
            .batch_size(BATCH_SIZE)
            .discount_factor(DISCOUNT_FACTOR)
            .target_sync(TargetSync::Soft { tau: TAU })
            .explorer(EpsilonGreedy::default())
            .critic_loss(CriticLoss::SmoothL1)
            .clip_grad_value(Some(CLIP_GRAD_VALUE))
            .seed(SEED);
        let replay_buffer_config = ReplayMemoryConfig::default()
            .capacity(REPLAY_MEMORY_CAPACITY)
            .seed(SEED);
        let trainer_config = TrainerConfig::default()
            .n_episodes(N_EPISODES)
            .eval_interval(EVAL_INTERVAL)
            .flush_record_interval(FLUSH_RECORD_INTERVAL);

        Self {
            env_config: CartPoleConfig::default(),
            agent_config,
            replay_buffer_config,
            trainer_config,
            n_eval_episodes: N_EVAL_EPISODES,
            seed: SEED,
        }
    }
}

impl DqnCartpoleConfig {
    /// Sets the number of training episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.trainer_config.n_episodes = v;
        self
    }

    /// Sets the seeds of the environment, the replay memory and the agent.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self.agent_config = self.agent_config.seed(v);
        self.replay_buffer_config = self.replay_buffer_config.seed(v);
        self
    }

    /// Constructs [`DqnCartpoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of the training from {}", path_.to_str().unwrap_or("?"));
        Ok(b)
    }

    /// Saves [`DqnCartpoleConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of the training into {}", path_.to_str().unwrap_or("?"));
        Ok(())
    }
}
