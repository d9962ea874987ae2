//! Action of [`CartPoleEnv`](crate::CartPoleEnv).
use qlearn_core::Act;

/// A discrete action, `0` pushes the cart to the left and `1` to the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartPoleAct(pub usize);

impl CartPoleAct {
    /// Push the cart to the left.
    pub const LEFT: Self = Self(0);

    /// Push the cart to the right.
    pub const RIGHT: Self = Self(1);
}

impl Act for CartPoleAct {}

impl From<usize> for CartPoleAct {
    fn from(a: usize) -> Self {
        Self(a)
    }
}

impl From<CartPoleAct> for usize {
    fn from(a: CartPoleAct) -> Self {
        a.0
    }
}
