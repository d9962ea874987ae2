//! Observation of [`CartPoleEnv`](crate::CartPoleEnv).
use qlearn_core::Obs;

/// Cart position, cart velocity, pole angle and pole angular velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartPoleObs(pub [f32; 4]);

impl CartPoleObs {
    /// Returns the observation as a slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl Obs for CartPoleObs {}

impl From<[f64; 4]> for CartPoleObs {
    fn from(state: [f64; 4]) -> Self {
        Self(state.map(|v| v as f32))
    }
}

impl From<CartPoleObs> for Vec<f32> {
    fn from(obs: CartPoleObs) -> Self {
        obs.0.to_vec()
    }
}
