//! Interface of neural networks used in RL agents.
use anyhow::Result;
use candle_nn::VarBuilder;

/// Neural network model not owing its [`VarMap`] internally.
///
/// Parameters are created through the given [`VarBuilder`], so that two
/// models built with the same configuration have the same parameter names.
/// This is what target networks rely on.
///
/// [`VarMap`]: candle_nn::VarMap
pub trait SubModel1 {
    /// Configuration from which [`SubModel1`] is constructed.
    type Config;

    /// Input of the [`SubModel1`].
    type Input;

    /// Output of the [`SubModel1`].
    type Output;

    /// Builds [`SubModel1`] with [`VarBuilder`] and [`SubModel1::Config`].
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// A generalized forward function.
    fn forward(&self, input: &Self::Input) -> Result<Self::Output>;
}
