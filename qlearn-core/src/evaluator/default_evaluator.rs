//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue::Scalar},
    Env, Policy,
};
use anyhow::Result;
use log::debug;

/// Runs a fixed number of episodes and reports the average return.
///
/// The returned [`Record`] holds `"eval_return"`, the mean of undiscounted
/// episode returns, and `"eval_episode_length"`, the mean episode length.
/// An episode ends when the environment terminates or truncates it, or after
/// `max_steps_per_episode` steps if set.
///
/// # Examples
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<CartPoleEnv>::new(&config, 42, 10)?;
/// agent.eval();
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Average return: {}", record.get_scalar("eval_return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    max_steps_per_episode: Option<usize>,
    env: E,
}

impl<E: Env, P: Policy<E>> Evaluator<E, P> for DefaultEvaluator<E> {
    fn evaluate(&mut self, policy: &mut P) -> Result<Record> {
        let mut r_total = 0f32;
        let mut len_total = 0usize;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut r_episode = 0f32;
            let mut len_episode = 0usize;

            loop {
                let act = policy.sample(&prev_obs)?;
                let (step, _) = self.env.step(&act)?;
                r_episode += step.reward;
                len_episode += 1;
                let is_capped = self
                    .max_steps_per_episode
                    .is_some_and(|m| len_episode >= m);
                if step.is_done() || is_capped {
                    break;
                }
                prev_obs = step.obs;
            }

            debug!("Evaluation episode {}: return = {}", ix, r_episode);
            r_total += r_episode;
            len_total += len_episode;
        }

        let n = self.n_episodes.max(1) as f32;
        let mut record = Record::from_scalar("eval_return", r_total / n);
        record.insert("eval_episode_length", Scalar(len_total as f32 / n));
        Ok(record)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            max_steps_per_episode: None,
            env: E::build(config, seed)?,
        })
    }

    /// Caps the number of steps of each evaluation episode.
    pub fn max_steps_per_episode(mut self, v: Option<usize>) -> Self {
        self.max_steps_per_episode = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{CounterEnv, CounterEnvConfig, DummyAgent};

    #[test]
    fn test_evaluate_until_termination() -> Result<()> {
        let config = CounterEnvConfig { episode_len: 7 };
        let mut evaluator = DefaultEvaluator::<CounterEnv>::new(&config, 0, 3)?;
        let mut agent = DummyAgent::new(1);

        let record = evaluator.evaluate(&mut agent)?;
        assert_eq!(record.get_scalar("eval_return")?, 7.0);
        assert_eq!(record.get_scalar("eval_episode_length")?, 7.0);
        Ok(())
    }

    #[test]
    fn test_max_steps_per_episode_ends_long_episodes() -> Result<()> {
        let config = CounterEnvConfig {
            episode_len: usize::MAX,
        };
        let mut evaluator =
            DefaultEvaluator::<CounterEnv>::new(&config, 0, 2)?.max_steps_per_episode(Some(25));
        let mut agent = DummyAgent::new(1);

        let record = evaluator.evaluate(&mut agent)?;
        assert_eq!(record.get_scalar("eval_return")?, 25.0);
        assert_eq!(record.get_scalar("eval_episode_length")?, 25.0);
        Ok(())
    }
}
