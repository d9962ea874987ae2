//! Bounded replay memory of transitions.
mod base;
mod config;
mod step_proc;
mod transition;
pub use base::ReplayMemory;
pub use config::ReplayMemoryConfig;
pub use step_proc::{TransitionProcessor, TransitionProcessorConfig};
pub use transition::Transition;
