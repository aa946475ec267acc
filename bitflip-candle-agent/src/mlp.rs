//! Multilayer perceptron.
mod config;
use anyhow::{Context, Result};
use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
pub use config::MlpConfig;

/// Returns vector of linear modules from [`MlpConfig`].
///
/// Layer `i` is registered under `{prefix}.ln{i}`.
fn create_linear_layers(prefix: &str, vs: VarBuilder, config: &MlpConfig) -> Result<Vec<Linear>> {
    let dims: Vec<usize> = std::iter::once(config.in_dim)
        .chain(config.units.iter().copied())
        .chain(std::iter::once(config.out_dim))
        .collect();
    let vs = vs.pp(prefix);

    dims.windows(2)
        .enumerate()
        .map(|(i, d)| Ok(linear(d[0], d[1], vs.pp(format!("ln{}", i)))?))
        .collect()
}

/// Multilayer perceptron with ReLU activation function.
///
/// No activation is applied to the output layer.
pub struct Mlp {
    config: MlpConfig,
    layers: Vec<Linear>,
}

impl Mlp {
    /// Builds the network, registering its parameters in `vs`.
    pub fn build(vs: VarBuilder, config: MlpConfig) -> Result<Self> {
        config.validate()?;
        let layers = create_linear_layers("mlp", vs, &config)?;
        Ok(Self { config, layers })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Maps a batch of shape `(n, in_dim)` to `(n, out_dim)`.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (last, hidden) = self.layers.split_last().context("MLP has no layers")?;
        let mut xs = xs.clone();
        for layer in hidden {
            xs = layer.forward(&xs)?.relu()?;
        }
        Ok(last.forward(&xs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_forward_shape() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, MlpConfig::new(6, vec![16, 8], 3))?;
        let xs = Tensor::zeros((5, 6), DType::F32, &Device::Cpu)?;
        assert_eq!(mlp.forward(&xs)?.dims(), &[5, 3]);

        // Weights and biases of three layers
        assert_eq!(varmap.all_vars().len(), 6);
        Ok(())
    }

    #[test]
    fn test_no_hidden_layer() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, MlpConfig::new(4, vec![], 2))?;
        let xs = Tensor::ones((1, 4), DType::F32, &Device::Cpu)?;
        assert_eq!(mlp.forward(&xs)?.dims(), &[1, 2]);
        Ok(())
    }
}
