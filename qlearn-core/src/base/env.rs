//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// The environment is treated as a black box with a fixed observation
/// dimensionality and a fixed number of discrete actions. Both are queried
/// once when an agent is configured.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    ///
    /// Errors are fatal: the caller does not retry.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Resets the environment with a given index.
    ///
    /// The index is used in an arbitrary way. For example, it can be used as a random seed,
    /// which is useful when evaluation of a trained agent. This method is called
    /// in [`DefaultEvaluator`] for evaluation.
    ///
    /// [`DefaultEvaluator`]: crate::DefaultEvaluator
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;

    /// Dimension of the observation vector.
    fn obs_dim(&self) -> usize;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;
}
