#![warn(missing_docs)]
//! Core components for training value-based agents with experience replay.
//!
//! This crate is independent of any deep learning backend. It provides
//!
//! * traits for environments ([`Env`]), policies ([`Policy`]) and trainable
//!   agents ([`Agent`]),
//! * a bounded FIFO replay memory ([`replay_buffer::ReplayMemory`]) holding
//!   [`replay_buffer::Transition`]s,
//! * the episodic training loop ([`Trainer`]) and greedy evaluation
//!   ([`DefaultEvaluator`]),
//! * records and recorders for metrics ([`record`]).
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Configurable, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
    StepProcessor,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Sampler, Trainer, TrainerConfig};

#[cfg(test)]
mod dummy;
