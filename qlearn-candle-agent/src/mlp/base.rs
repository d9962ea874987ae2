use super::MlpConfig;
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

/// Returns vector of linear modules from [`MlpConfig`].
fn create_linear_layers(prefix: &str, vs: VarBuilder, config: &MlpConfig) -> Result<Vec<Linear>> {
    let dims = std::iter::once(config.in_dim)
        .chain(config.units.iter().copied())
        .chain(std::iter::once(config.out_dim))
        .collect::<Vec<_>>();
    let vs = vs.pp(prefix);

    let layers = dims
        .windows(2)
        .enumerate()
        .map(|(i, w)| linear(w[0], w[1], vs.pp(format!("ln{}", i))))
        .collect::<candle_core::Result<Vec<_>>>()?;

    Ok(layers)
}

/// Multilayer perceptron with ReLU activation function.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    layers: Vec<Linear>,
}

impl SubModel1 for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let mut xs = xs.to_device(&self.device)?;
        let n_layers = self.layers.len();

        for (i, layer) in self.layers.iter().enumerate() {
            xs = layer.forward(&xs)?;
            if i + 1 < n_layers || self.config.activation_out {
                xs = xs.relu()?;
            }
        }

        Ok(xs)
    }

    fn build(vs: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vs.device().clone();
        let layers = create_linear_layers("mlp", vs, &config)?;

        Ok(Self {
            config,
            device,
            layers,
        })
    }
}
