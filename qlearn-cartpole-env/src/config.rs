//! Configuration of [`CartPoleEnv`](crate::CartPoleEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Numerical integration scheme of the dynamics.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum Integrator {
    /// Explicit Euler.
    #[default]
    Euler,

    /// Semi-implicit Euler, velocities are updated before positions.
    SemiImplicitEuler,
}

/// Configuration of [`CartPoleEnv`](crate::CartPoleEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CartPoleConfig {
    /// Time limit of an episode in steps. `None` disables truncation.
    pub max_steps: Option<usize>,

    /// Integration scheme.
    pub integrator: Integrator,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(500),
            integrator: Integrator::Euler,
        }
    }
}

impl CartPoleConfig {
    /// Sets the time limit of an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the integration scheme.
    pub fn integrator(mut self, v: Integrator) -> Self {
        self.integrator = v;
        self
    }

    /// Constructs [`CartPoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CartPoleConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
