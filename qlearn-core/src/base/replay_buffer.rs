//! Replay buffer interface for reinforcement learning.
//!
//! Replay buffers store experiences (transitions) produced by interacting with
//! an environment and hand out randomly sampled batches for training.
//! Storing and sampling are split into two traits so that code which only
//! pushes experiences does not depend on the batch type.
use crate::error::QlearnError;

/// Interface for buffers that store experiences from environments.
///
/// # Examples
///
/// ```ignore
/// struct SimpleBuffer<T> {
///     items: Vec<T>,
/// }
///
/// impl<T> ExperienceBufferBase for SimpleBuffer<T> {
///     type Item = T;
///
///     fn push(&mut self, tr: T) {
///         self.items.push(tr);
///     }
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
/// }
/// ```
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    ///
    /// Pushing never fails. A bounded buffer evicts old items to make room.
    fn push(&mut self, tr: Self::Item);

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no experience.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for training.
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a new replay buffer from the given configuration.
    fn build(config: &Self::Config) -> Result<Self, QlearnError>
    where
        Self: Sized;

    /// Samples a batch of `size` experiences.
    ///
    /// Returns [`QlearnError::InsufficientData`] if the buffer holds fewer
    /// than `size` experiences.
    fn batch(&mut self, size: usize) -> Result<Self::Batch, QlearnError>;
}
