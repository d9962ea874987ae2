//! Experience sampling.
//!
//! [`Sampler`] owns the training environment. Each call of
//! [`Sampler::sample_and_push`] does one environment step with an action
//! taken from the agent, turns the step into a transition with a
//! [`StepProcessor`] and pushes it into the replay buffer.
use crate::{record::Record, Env, ExperienceBufferBase, Policy, StepProcessor};
use anyhow::Result;

/// Manages the sampling of experiences from the environment.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,

    /// Previous observation, `None` when a new episode has to be started.
    prev_obs: Option<E::Obs>,

    step_processor: P,

    /// Undiscounted return of the current episode.
    episode_return: f32,

    /// Environment steps in the current episode.
    episode_length: usize,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a new sampler with the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            episode_return: 0.0,
            episode_length: 0,
        }
    }

    fn reset_env(&mut self) -> Result<E::Obs> {
        let init_obs = self.env.reset()?;
        self.step_processor.reset(init_obs.clone());
        self.episode_return = 0.0;
        self.episode_length = 0;
        Ok(init_obs)
    }

    /// Resets the environment and starts a new episode.
    pub fn reset_episode(&mut self) -> Result<()> {
        self.prev_obs = Some(self.reset_env()?);
        Ok(())
    }

    /// Marks the current episode as finished.
    ///
    /// The next call of [`Sampler::sample_and_push`] resets the environment.
    pub fn end_episode(&mut self) {
        self.prev_obs = None;
    }

    /// Samples an experience and pushes it to the replay buffer.
    ///
    /// Returns the record from the environment and whether the episode is done,
    /// i.e., terminated or truncated.
    pub fn sample_and_push<A, R>(&mut self, agent: &mut A, buffer: &mut R) -> Result<(Record, bool)>
    where
        A: Policy<E>,
        R: ExperienceBufferBase<Item = P::Output>,
    {
        let prev_obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => self.reset_env()?,
        };

        let act = agent.sample(&prev_obs)?;
        let (step, record) = self.env.step(&act)?;
        let is_done = step.is_done();

        self.episode_return += step.reward;
        self.episode_length += 1;
        if !is_done {
            self.prev_obs = Some(step.obs.clone());
        }

        let transition = self.step_processor.process(step);
        buffer.push(transition);

        Ok((record, is_done))
    }

    /// Undiscounted return of the current (or just finished) episode.
    pub fn episode_return(&self) -> f32 {
        self.episode_return
    }

    /// Length of the current (or just finished) episode.
    pub fn episode_length(&self) -> usize {
        self.episode_length
    }
}
