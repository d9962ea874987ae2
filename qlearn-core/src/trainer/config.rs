//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// All intervals except `opt_interval` are counted in episodes.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub n_episodes: usize,

    /// Caps the length of an episode in environment steps.
    ///
    /// This is applied on top of the time limit of the environment itself.
    pub max_steps_per_episode: Option<usize>,

    /// Interval of optimization steps in environment steps.
    pub opt_interval: usize,

    /// Warmup period, for filling replay buffer, in environment steps.
    pub warmup_period: usize,

    /// Interval of evaluation in episodes. `0` disables evaluation.
    pub eval_interval: usize,

    /// Interval of flushing records in episodes.
    pub flush_record_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 600,
            max_steps_per_episode: None,
            opt_interval: 1,
            warmup_period: 0,
            eval_interval: 0,
            flush_record_interval: 10,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the maximum number of environment steps in an episode.
    pub fn max_steps_per_episode(mut self, v: Option<usize>) -> Self {
        self.max_steps_per_episode = v;
        self
    }

    /// Sets the interval of optimization in environment steps.
    pub fn opt_interval(mut self, opt_interval: usize) -> Self {
        self.opt_interval = opt_interval;
        self
    }

    /// Sets warmup period in environment steps.
    pub fn warmup_period(mut self, warmup_period: usize) -> Self {
        self.warmup_period = warmup_period;
        self
    }

    /// Sets the interval of evaluation in episodes.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Sets the interval of flushing records in episodes.
    pub fn flush_record_interval(mut self, flush_record_interval: usize) -> Self {
        self.flush_record_interval = flush_record_interval;
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
