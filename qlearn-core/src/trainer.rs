//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    error::QlearnError,
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    Agent, Env, Evaluator, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::info;
pub use sampler::Sampler;
use std::collections::VecDeque;

/// Window of the moving average of episode lengths.
const AVG_WINDOW: usize = 100;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episodic training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`] and a recorder implementing
///    [`AggregateRecorder`]. Counters `env_steps = 0` and `opt_steps = 0`.
/// 1. Reset [`Env`] and the [`StepProcessor`] at the start of an episode.
/// 2. Do an environment step with the action sampled from the agent and push a
///    transition to the replay buffer.
/// 3. `env_steps += 1`
/// 4. If `env_steps >= warmup_period` and `env_steps % opt_interval == 0`, do an
///    optimization step. The agent can skip it, e.g., while the replay buffer
///    holds fewer transitions than a batch. Otherwise `opt_steps += 1` and the
///    record of the step is stored.
/// 5. If the episode is terminated, truncated, or reached `max_steps_per_episode`,
///    store the episode record. Otherwise go back to 2.
/// 6. Every `eval_interval` episodes, evaluate the agent in evaluation mode.
/// 7. Every `flush_record_interval` episodes, store the wall-clock time as
///    `datetime` and flush the recorder with the episode count as its step.
/// 8. Back to 1 until `n_episodes` episodes are done.
///
/// # Interaction of objects
///
/// In [`Trainer::train()`] method, objects interact as shown below:
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|Transition|D[ReplayBufferBase]
///     D -->|Batch|A
/// ```
///
/// [`Trainer::train()`]: Trainer::train
pub struct Trainer {
    config: TrainerConfig,
}

/// Statistics of a finished episode.
struct EpisodeStats {
    episode: usize,
    length: usize,
    ret: f32,
    opt_steps: usize,
    length_avg: f32,
}

impl EpisodeStats {
    fn record(&self) -> Record {
        Record::from_slice(&[
            ("episode", Scalar(self.episode as f32)),
            ("episode_length", Scalar(self.length as f32)),
            ("episode_return", Scalar(self.ret)),
            ("opt_steps", Scalar(self.opt_steps as f32)),
            ("episode_length_avg100", Scalar(self.length_avg)),
        ])
    }
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self, QlearnError> {
        if config.opt_interval == 0 {
            return Err(QlearnError::InvalidConfig(
                "opt_interval must be positive".into(),
            ));
        }
        if config.flush_record_interval == 0 {
            return Err(QlearnError::InvalidConfig(
                "flush_record_interval must be positive".into(),
            ));
        }
        Ok(Self { config })
    }

    /// Configuration of the trainer.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Performs an optimization step if the schedule allows it.
    ///
    /// Returns the record of the agent when the step was actually done.
    fn opt_step<E, R, A>(&self, agent: &mut A, buffer: &mut R, env_steps: usize) -> Result<Option<Record>>
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        if env_steps < self.config.warmup_period || env_steps % self.config.opt_interval != 0 {
            return Ok(None);
        }
        agent.opt(buffer)
    }

    /// Train the agent.
    ///
    /// Errors from the environment, the agent or the evaluator abort training.
    pub fn train<E, P, R, A, D>(
        &mut self,
        env: E,
        step_proc: P,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
        D: Evaluator<E, A>,
    {
        let mut sampler = Sampler::new(env, step_proc);
        let mut env_steps: usize = 0;
        let mut opt_steps: usize = 0;
        let mut lengths = VecDeque::with_capacity(AVG_WINDOW);
        agent.train();

        for episode in 1..=self.config.n_episodes {
            sampler.reset_episode()?;

            loop {
                let (record, is_done) = sampler.sample_and_push(agent, buffer)?;
                env_steps += 1;
                if !record.is_empty() {
                    recorder.store(record);
                }

                if let Some(record) = self.opt_step::<E, R, A>(agent, buffer, env_steps)? {
                    opt_steps += 1;
                    recorder.store(record);
                }

                let is_capped = self
                    .config
                    .max_steps_per_episode
                    .is_some_and(|m| sampler.episode_length() >= m);
                if is_done || is_capped {
                    sampler.end_episode();
                    break;
                }
            }

            if lengths.len() == AVG_WINDOW {
                lengths.pop_front();
            }
            lengths.push_back(sampler.episode_length());
            let stats = EpisodeStats {
                episode,
                length: sampler.episode_length(),
                ret: sampler.episode_return(),
                opt_steps,
                length_avg: lengths.iter().sum::<usize>() as f32 / lengths.len() as f32,
            };
            recorder.store(stats.record());

            if self.config.eval_interval > 0 && episode % self.config.eval_interval == 0 {
                agent.eval();
                let record = evaluator.evaluate(agent)?;
                agent.train();
                if let Ok(eval_return) = record.get_scalar("eval_return") {
                    info!("Episode {}: eval_return = {}", episode, eval_return);
                }
                recorder.store(record);
            }

            if episode % self.config.flush_record_interval == 0 || episode == self.config.n_episodes
            {
                info!(
                    "Episode {}: length = {}, avg{} = {:.1}, env_steps = {}, opt_steps = {}",
                    episode, stats.length, AVG_WINDOW, stats.length_avg, env_steps, opt_steps
                );
                recorder.store(Record::from_slice(&[("datetime", DateTime(Local::now()))]));
                recorder.flush(episode as i64);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{CounterAct, CounterEnv, CounterEnvConfig, CounterObs, DummyAgent},
        record::{BufferedRecorder, NullRecorder},
        replay_buffer::{
            ReplayMemory, ReplayMemoryConfig, Transition, TransitionProcessor,
            TransitionProcessorConfig,
        },
        DefaultEvaluator,
    };

    type Buffer = ReplayMemory<Transition<CounterObs, CounterAct>>;

    fn run(
        config: TrainerConfig,
        episode_len: usize,
        batch_size: usize,
    ) -> Result<(DummyAgent, Buffer, BufferedRecorder)> {
        let env_config = CounterEnvConfig { episode_len };
        let env = CounterEnv::build(&env_config, 0)?;
        let step_proc = TransitionProcessor::build(&TransitionProcessorConfig::default());
        let mut agent = DummyAgent::new(batch_size);
        let mut buffer = Buffer::build(&ReplayMemoryConfig::default().capacity(100))?;
        let mut recorder = BufferedRecorder::new();
        let mut evaluator = DefaultEvaluator::<CounterEnv>::new(&env_config, 0, 2)?;

        let mut trainer = Trainer::build(config)?;
        trainer.train(
            env,
            step_proc,
            &mut agent,
            &mut buffer,
            &mut recorder,
            &mut evaluator,
        )?;
        Ok((agent, buffer, recorder))
    }

    #[test]
    fn test_completes_n_episodes() -> Result<()> {
        let config = TrainerConfig::default().n_episodes(4);
        let (_, buffer, recorder) = run(config, 5, 8)?;

        let episodes = recorder
            .with_key("episode")
            .map(|r| r.get_scalar("episode"))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(episodes, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buffer.len(), 20);
        Ok(())
    }

    #[test]
    fn test_datetime_is_stored_at_flush() -> Result<()> {
        let config = TrainerConfig::default()
            .n_episodes(5)
            .flush_record_interval(2);
        let (_, _, recorder) = run(config, 3, 8)?;

        // episodes 2, 4 and the last one
        let records = recorder.with_key("datetime").collect::<Vec<_>>();
        assert_eq!(records.len(), 3);
        assert!(records[0].get_datetime("datetime")? <= records[2].get_datetime("datetime")?);
        Ok(())
    }

    #[test]
    fn test_skips_optimization_until_batch_is_available() -> Result<()> {
        let config = TrainerConfig::default().n_episodes(3);
        let (agent, _, recorder) = run(config, 5, 8)?;

        // 15 environment steps, first batch of 8 available at step 8
        assert_eq!(agent.n_opts, 8);
        let opt_steps = recorder
            .with_key("opt_steps")
            .map(|r| r.get_scalar("opt_steps"))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(opt_steps, vec![0.0, 3.0, 8.0]);
        Ok(())
    }

    #[test]
    fn test_warmup_and_opt_interval() -> Result<()> {
        let config = TrainerConfig::default()
            .n_episodes(2)
            .warmup_period(4)
            .opt_interval(2);
        let (agent, _, _) = run(config, 5, 1)?;

        // steps 4, 6, 8, 10
        assert_eq!(agent.n_opts, 4);
        Ok(())
    }

    #[test]
    fn test_max_steps_per_episode() -> Result<()> {
        let config = TrainerConfig::default()
            .n_episodes(3)
            .max_steps_per_episode(Some(2));
        let (_, buffer, recorder) = run(config, 5, 100)?;

        assert_eq!(buffer.len(), 6);
        for record in recorder.with_key("episode_length") {
            assert_eq!(record.get_scalar("episode_length")?, 2.0);
        }
        // capped episodes bootstrap from the last observation
        assert!(buffer.iter().all(|t| !t.is_terminal()));
        Ok(())
    }

    #[test]
    fn test_evaluation_interval() -> Result<()> {
        let config = TrainerConfig::default().n_episodes(4).eval_interval(2);
        let (agent, _, recorder) = run(config, 5, 8)?;

        let returns = recorder
            .with_key("eval_return")
            .map(|r| r.get_scalar("eval_return"))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(returns, vec![5.0, 5.0]);
        assert!(agent.is_train);
        Ok(())
    }

    #[test]
    fn test_train_without_records() -> Result<()> {
        let env_config = CounterEnvConfig { episode_len: 3 };
        let env = CounterEnv::build(&env_config, 0)?;
        let step_proc = TransitionProcessor::build(&TransitionProcessorConfig::default());
        let mut agent = DummyAgent::new(2);
        let mut buffer = Buffer::build(&ReplayMemoryConfig::default().capacity(4))?;
        let mut evaluator = DefaultEvaluator::<CounterEnv>::new(&env_config, 0, 1)?;

        let mut trainer = Trainer::build(TrainerConfig::default().n_episodes(3))?;
        trainer.train(
            env,
            step_proc,
            &mut agent,
            &mut buffer,
            &mut NullRecorder::new(),
            &mut evaluator,
        )?;
        assert_eq!(buffer.len(), 4);
        assert_eq!(agent.n_opts, 8);
        Ok(())
    }

    #[test]
    fn test_zero_opt_interval_is_rejected() {
        let config = TrainerConfig::default().opt_interval(0);
        assert!(matches!(
            Trainer::build(config),
            Err(QlearnError::InvalidConfig(_))
        ));
    }
}
