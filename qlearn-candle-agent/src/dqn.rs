//! DQN agent.
//!
//! [`Dqn`] holds a policy network and a target network of the same
//! structure. Actions are taken with an [`EpsilonGreedy`] explorer in training
//! mode and greedily in evaluation mode. Each optimization step regresses
//! `Q(s, a)` onto the TD target `r + γ max_a' Q_tgt(s', a')` (`r` alone for
//! terminal transitions), then synchronizes the target network according to
//! [`TargetSync`].
mod base;
mod config;
mod explorer;
mod model;
pub use base::Dqn;
pub use config::{DqnConfig, TargetSync};
pub use explorer::{EpsilonGreedy, EpsilonSchedule};
pub use model::{DqnModel, DqnModelConfig};
