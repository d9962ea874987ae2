//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters. Returns `Ok(None)` when the step was
    /// skipped, e.g., the buffer does not hold enough transitions yet.
    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>>;
}
