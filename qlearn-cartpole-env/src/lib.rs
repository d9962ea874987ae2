#![warn(missing_docs)]
//! CartPole-v1 environment implementing [`qlearn_core::Env`].
//!
//! A pole is attached by an un-actuated joint to a cart moving along a
//! frictionless track. The agent pushes the cart to the left (action `0`) or to
//! the right (action `1`). A reward of `+1` is given for every step, including
//! the terminating one. An episode terminates when the pole angle leaves
//! ±12 degrees or the cart position leaves ±2.4, and is truncated after
//! [`CartPoleConfig::max_steps`] steps (500 by default).
//!
//! The dynamics and constants follow the classic control task, so returns are
//! comparable with the Gymnasium `CartPole-v1` environment.
//!
//! ```
//! use qlearn_cartpole_env::{CartPoleAct, CartPoleConfig, CartPoleEnv};
//! use qlearn_core::Env;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut env = CartPoleEnv::build(&CartPoleConfig::default(), 42)?;
//! let obs = env.reset()?;
//! assert_eq!(obs.as_slice().len(), 4);
//! let (step, _) = env.step(&CartPoleAct::RIGHT)?;
//! assert_eq!(step.reward, 1.0);
//! # Ok(())
//! # }
//! ```
mod act;
mod base;
mod config;
mod obs;
pub use act::CartPoleAct;
pub use base::CartPoleEnv;
pub use config::{CartPoleConfig, Integrator};
pub use obs::CartPoleObs;
