//! Minimal environment and agent used in tests.
use crate::{
    error::QlearnError, record::Record, Act, Agent, Env, Obs, Policy, ReplayBufferBase, Step,
};
use anyhow::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct CounterObs(pub f32);

impl Obs for CounterObs {}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterAct(pub usize);

impl Act for CounterAct {}

#[derive(Clone, Debug)]
pub struct CounterEnvConfig {
    pub episode_len: usize,
}

/// Observation is the step count of the episode. Terminates after
/// `episode_len` steps with reward 1 per step.
pub struct CounterEnv {
    episode_len: usize,
    t: usize,
}

impl Env for CounterEnv {
    type Config = CounterEnvConfig;
    type Obs = CounterObs;
    type Act = CounterAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: config.episode_len,
            t: 0,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let is_terminated = self.t >= self.episode_len;
        let step = Step::new(
            CounterObs(self.t as f32),
            a.clone(),
            1.0,
            is_terminated,
            false,
            (),
        );
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(CounterObs(0.0))
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn obs_dim(&self) -> usize {
        1
    }

    fn n_actions(&self) -> usize {
        2
    }
}

/// Always takes action 0 and counts optimization steps.
pub struct DummyAgent {
    pub batch_size: usize,
    pub n_opts: usize,
    pub is_train: bool,
}

impl DummyAgent {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            n_opts: 0,
            is_train: false,
        }
    }
}

impl Policy<CounterEnv> for DummyAgent {
    fn sample(&mut self, _obs: &CounterObs) -> Result<CounterAct> {
        Ok(CounterAct(0))
    }
}

impl<R: ReplayBufferBase> Agent<CounterEnv, R> for DummyAgent {
    fn train(&mut self) {
        self.is_train = true;
    }

    fn eval(&mut self) {
        self.is_train = false;
    }

    fn is_train(&self) -> bool {
        self.is_train
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>> {
        match buffer.batch(self.batch_size) {
            Ok(_) => {
                self.n_opts += 1;
                Ok(Some(Record::from_scalar("loss", 1.0)))
            }
            Err(QlearnError::InsufficientData { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
