//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::{Configurable, Policy};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step, StepProcessor};

/// An observation of an environment.
pub trait Obs: Clone + Debug {}

/// An action of an environment.
pub trait Act: Clone + Debug {}
