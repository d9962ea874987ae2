//! Configuration of [`ReplayMemory`](super::ReplayMemory).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayMemory`](super::ReplayMemory).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayMemoryConfig {
    pub(super) capacity: usize,
    pub(super) seed: u64,
}

impl Default for ReplayMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
        }
    }
}

impl ReplayMemoryConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the seed of the random number generator used for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`ReplayMemoryConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReplayMemoryConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
