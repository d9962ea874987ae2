//! CartPole environment.
use crate::{CartPoleAct, CartPoleConfig, CartPoleObs, Integrator};
use anyhow::{bail, Result};
use log::{trace, warn};
use qlearn_core::{record::Record, Env, Step};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::f64::consts::PI;

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
/// Half the pole's length.
const LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
/// Seconds between state updates.
const TAU: f64 = 0.02;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * PI / 360.0;
const X_THRESHOLD: f64 = 2.4;
const RESET_BOUND: f64 = 0.05;

/// CartPole-v1 environment.
///
/// The internal state is kept in `f64`, observations are given in `f32`.
pub struct CartPoleEnv {
    config: CartPoleConfig,
    seed: i64,
    rng: SmallRng,

    /// `[x, x_dot, theta, theta_dot]`
    state: [f64; 4],

    /// Steps in the current episode.
    count_steps: usize,

    /// `true` after a terminal step until the next reset.
    is_terminated: bool,
}

impl CartPoleEnv {
    /// Current internal state `[x, x_dot, theta, theta_dot]`.
    pub fn state(&self) -> [f64; 4] {
        self.state
    }

    fn reset_state(&mut self) -> CartPoleObs {
        for v in self.state.iter_mut() {
            *v = self.rng.gen_range(-RESET_BOUND..RESET_BOUND);
        }
        self.count_steps = 0;
        self.is_terminated = false;
        self.state.into()
    }

    fn integrate(&mut self, force: f64) {
        let [x, x_dot, theta, theta_dot] = self.state;
        let (sintheta, costheta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sintheta) / TOTAL_MASS;
        let thetaacc = (GRAVITY * sintheta - costheta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * costheta * costheta / TOTAL_MASS));
        let xacc = temp - POLE_MASS_LENGTH * thetaacc * costheta / TOTAL_MASS;

        self.state = match self.config.integrator {
            Integrator::Euler => [
                x + TAU * x_dot,
                x_dot + TAU * xacc,
                theta + TAU * theta_dot,
                theta_dot + TAU * thetaacc,
            ],
            Integrator::SemiImplicitEuler => {
                let x_dot = x_dot + TAU * xacc;
                let theta_dot = theta_dot + TAU * thetaacc;
                [x + TAU * x_dot, x_dot, theta + TAU * theta_dot, theta_dot]
            }
        };
    }

    fn is_out_of_bounds(&self) -> bool {
        let [x, _, theta, _] = self.state;
        !(-X_THRESHOLD..=X_THRESHOLD).contains(&x)
            || !(-THETA_THRESHOLD..=THETA_THRESHOLD).contains(&theta)
    }
}

impl Env for CartPoleEnv {
    type Config = CartPoleConfig;
    type Obs = CartPoleObs;
    type Act = CartPoleAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            seed,
            rng: SmallRng::seed_from_u64(seed as u64),
            state: [0.0; 4],
            count_steps: 0,
            is_terminated: false,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let force = match a.0 {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            n => bail!("invalid action {}: CartPole has 2 actions", n),
        };
        if self.is_terminated {
            warn!("step() called after the episode terminated; call reset() first");
        }

        self.integrate(force);
        self.count_steps += 1;

        let is_terminated = self.is_out_of_bounds();
        let is_truncated = !is_terminated
            && self.config.max_steps.is_some_and(|m| self.count_steps >= m);
        let reward = match self.is_terminated {
            true => 0.0,
            false => 1.0,
        };
        self.is_terminated |= is_terminated;
        trace!("step {}: state = {:?}", self.count_steps, self.state);

        let step = Step::new(
            self.state.into(),
            *a,
            reward,
            is_terminated,
            is_truncated,
            (),
        );
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        Ok(self.reset_state())
    }

    /// Reseeds the random number generator with `seed + ix` before resetting,
    /// so that the `ix`-th evaluation episode always starts from the same state.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = SmallRng::seed_from_u64((self.seed as u64).wrapping_add(ix as u64));
        Ok(self.reset_state())
    }

    fn obs_dim(&self) -> usize {
        4
    }

    fn n_actions(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_episode(env: &mut CartPoleEnv, act: CartPoleAct) -> Result<(usize, Step<CartPoleEnv>)> {
        let mut n = 0;
        loop {
            let (step, _) = env.step(&act)?;
            n += 1;
            if step.is_done() {
                return Ok((n, step));
            }
        }
    }

    #[test]
    fn test_reset_within_bounds() -> Result<()> {
        let mut env = CartPoleEnv::build(&CartPoleConfig::default(), 0)?;
        for _ in 0..100 {
            let obs = env.reset()?;
            assert!(obs.as_slice().iter().all(|v| v.abs() <= 0.05));
        }
        Ok(())
    }

    #[test]
    fn test_pushing_one_way_terminates() -> Result<()> {
        let mut env = CartPoleEnv::build(&CartPoleConfig::default(), 1)?;
        env.reset()?;
        let (n, step) = run_episode(&mut env, CartPoleAct::RIGHT)?;

        assert!(step.is_terminated);
        assert!(!step.is_truncated);
        assert_eq!(step.reward, 1.0);
        assert!(n < 50);
        // pushing right tips the pole to the left
        assert!(env.state()[2] < -THETA_THRESHOLD);
        Ok(())
    }

    #[test]
    fn test_time_limit_truncates() -> Result<()> {
        assert_eq!(CartPoleConfig::default().max_steps, Some(500));

        let config = CartPoleConfig::default().max_steps(Some(10));
        let mut env = CartPoleEnv::build(&config, 2)?;
        env.reset()?;

        // alternating pushes keep the pole up for a few steps
        for t in 1..=10 {
            let (step, _) = env.step(&CartPoleAct(t % 2))?;
            assert!(!step.is_terminated);
            assert_eq!(step.is_truncated, t == 10);
        }
        Ok(())
    }

    #[test]
    fn test_no_time_limit() -> Result<()> {
        let config = CartPoleConfig::default().max_steps(None);
        let mut env = CartPoleEnv::build(&config, 4)?;
        env.reset()?;
        let (_, step) = run_episode(&mut env, CartPoleAct::LEFT)?;
        assert!(step.is_terminated);
        assert!(!step.is_truncated);
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = CartPoleEnv::build(&CartPoleConfig::default(), 0)?;
        env.reset()?;
        assert!(env.step(&CartPoleAct(2)).is_err());
        Ok(())
    }

    #[test]
    fn test_same_seed_same_episode() -> Result<()> {
        let mut env1 = CartPoleEnv::build(&CartPoleConfig::default(), 3)?;
        let mut env2 = CartPoleEnv::build(&CartPoleConfig::default(), 3)?;
        assert_eq!(env1.reset()?, env2.reset()?);
        let (n1, step1) = run_episode(&mut env1, CartPoleAct::LEFT)?;
        let (n2, step2) = run_episode(&mut env2, CartPoleAct::LEFT)?;
        assert_eq!(n1, n2);
        assert_eq!(step1.obs, step2.obs);
        Ok(())
    }

    #[test]
    fn test_reset_with_index_is_reproducible() -> Result<()> {
        let mut env = CartPoleEnv::build(&CartPoleConfig::default(), 5)?;
        let obs1 = env.reset_with_index(3)?;
        env.reset()?;
        let obs2 = env.reset_with_index(3)?;
        assert_eq!(obs1, obs2);
        Ok(())
    }

    #[test]
    fn test_reset_with_index_wraps_seed() -> Result<()> {
        let mut env = CartPoleEnv::build(&CartPoleConfig::default(), -1)?;
        let obs0 = env.reset_with_index(0)?;
        let obs1 = env.reset_with_index(1)?;
        assert_ne!(obs0, obs1);

        // seed -1 with index 1 wraps around to seed 0
        let mut env0 = CartPoleEnv::build(&CartPoleConfig::default(), 0)?;
        assert_eq!(obs1, env0.reset_with_index(0)?);
        Ok(())
    }
}
