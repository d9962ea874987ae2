//! Exploration strategy of DQN.
use anyhow::Result;
use candle_core::{shape::D, Tensor};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Decay of epsilon over exploratory action selections.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub enum EpsilonSchedule {
    /// `eps = eps_final + (eps_start - eps_final) * exp(-steps / decay)`
    Exponential {
        /// Time constant of the decay in steps.
        decay: f64,
    },

    /// Linear interpolation from `eps_start` to `eps_final`, constant after
    /// `final_step`.
    Linear {
        /// The step at which epsilon reaches `eps_final`.
        final_step: usize,
    },
}

/// Epsilon-greedy explorer for DQN.
///
/// `n_steps` counts action selections in training mode and is advanced on
/// each call of [`EpsilonGreedy::action`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    #[serde(default)]
    pub n_steps: usize,
    pub eps_start: f64,
    pub eps_final: f64,
    pub schedule: EpsilonSchedule,
}

impl Default for EpsilonGreedy {
    /// `eps_start = 0.9`, `eps_final = 0.05` with exponential decay of 1000 steps.
    fn default() -> Self {
        Self {
            n_steps: 0,
            eps_start: 0.9,
            eps_final: 0.05,
            schedule: EpsilonSchedule::Exponential { decay: 1000.0 },
        }
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer with linear decay.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            schedule: EpsilonSchedule::Linear { final_step },
            ..Self::default()
        }
    }

    /// The current value of epsilon.
    pub fn epsilon(&self) -> f64 {
        let (start, fin) = (self.eps_start, self.eps_final);
        match self.schedule {
            EpsilonSchedule::Exponential { decay } => {
                fin + (start - fin) * (-(self.n_steps as f64) / decay).exp()
            }
            EpsilonSchedule::Linear { final_step } => {
                let d = (start - fin) / (final_step.max(1) as f64);
                (start - d * self.n_steps as f64).max(fin)
            }
        }
    }

    /// Takes an action based on action values of a single observation.
    ///
    /// * `a` - action values, the shape is `(1, n_actions)`.
    pub fn action(&mut self, a: &Tensor, rng: &mut impl Rng) -> Result<usize> {
        let eps = self.epsilon();
        self.n_steps += 1;

        if rng.gen::<f64>() < eps {
            let n_actions = a.dim(D::Minus1)?;
            Ok(rng.gen_range(0..n_actions))
        } else {
            greedy(a)
        }
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(self, v: f64) -> Self {
        let mut s = self;
        s.eps_final = v;
        s
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(self, v: f64) -> Self {
        let mut s = self;
        s.eps_start = v;
        s
    }

    /// Set the decay schedule.
    pub fn schedule(self, v: EpsilonSchedule) -> Self {
        let mut s = self;
        s.schedule = v;
        s
    }
}

/// Returns the action with the highest value for a single observation.
///
/// * `a` - action values, the shape is `(1, n_actions)`.
pub fn greedy(a: &Tensor) -> Result<usize> {
    let ix = a.argmax(D::Minus1)?.flatten_all()?.get(0)?;
    Ok(ix.to_scalar::<u32>()? as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_exponential_schedule() {
        let mut explorer = EpsilonGreedy::default();
        assert!((explorer.epsilon() - 0.9).abs() < 1e-12);

        let mut prev = explorer.epsilon();
        for n in [10, 100, 1000, 10000] {
            explorer.n_steps = n;
            let eps = explorer.epsilon();
            assert!(eps < prev);
            assert!(eps > 0.05);
            prev = eps;
        }
        explorer.n_steps = 1000;
        let expected = 0.05 + 0.85 * (-1f64).exp();
        assert!((explorer.epsilon() - expected).abs() < 1e-12);
        explorer.n_steps = 100_000;
        assert!((explorer.epsilon() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_linear_schedule() {
        let mut explorer = EpsilonGreedy::with_final_step(100)
            .eps_start(1.0)
            .eps_final(0.1);
        assert_eq!(explorer.epsilon(), 1.0);
        explorer.n_steps = 50;
        assert!((explorer.epsilon() - 0.55).abs() < 1e-12);
        explorer.n_steps = 200;
        assert_eq!(explorer.epsilon(), 0.1);
    }

    #[test]
    fn test_action() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(0);
        let a = Tensor::from_slice(&[0.1f32, 0.7, 0.2], (1, 3), &Device::Cpu)?;
        assert_eq!(greedy(&a)?, 1);

        // without exploration, the greedy action is always taken
        let mut explorer = EpsilonGreedy::default().eps_start(0.0).eps_final(0.0);
        for _ in 0..10 {
            assert_eq!(explorer.action(&a, &mut rng)?, 1);
        }
        assert_eq!(explorer.n_steps, 10);

        // with full exploration, every action shows up
        let mut explorer = EpsilonGreedy::default().eps_start(1.0).eps_final(1.0);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[explorer.action(&a, &mut rng)?] = true;
        }
        assert!(seen.iter().all(|&s| s));
        Ok(())
    }
}
