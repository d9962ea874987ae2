//! DQN agent implemented with [candle](https://crates.io/crates/candle-core).
pub mod dqn;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod util;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The first GPU if available, otherwise the CPU.
    #[default]
    Auto,

    /// The main CPU device.
    Cpu,

    /// The GPU device of the given ordinal.
    Cuda(usize),
}

impl Device {
    /// Resolves to a [`candle_core::Device`].
    ///
    /// This is done once at startup, the resolved device is passed to the agent.
    pub fn resolve(&self) -> Result<candle_core::Device> {
        let device = match self {
            Self::Auto => candle_core::Device::cuda_if_available(0)?,
            Self::Cpu => candle_core::Device::Cpu,
            Self::Cuda(n) => candle_core::Device::new_cuda(*n)?,
        };
        info!("Device: {:?}", device);
        Ok(device)
    }
}
