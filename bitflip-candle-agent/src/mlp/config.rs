use bitflip_core::error::BitFlipError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`](super::Mlp).
pub struct MlpConfig {
    pub(super) in_dim: usize,
    pub(super) units: Vec<usize>,
    pub(super) out_dim: usize,
}

impl MlpConfig {
    /// Creates configuration of MLP.
    ///
    /// * `units` - Sizes of the hidden layers.
    pub fn new(in_dim: usize, units: Vec<usize>, out_dim: usize) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
        }
    }

    /// Input dimension.
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    /// Output dimension.
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    pub(super) fn validate(&self) -> Result<(), BitFlipError> {
        if self.in_dim == 0 || self.out_dim == 0 || self.units.contains(&0) {
            return Err(BitFlipError::InvalidConfig(format!(
                "layer sizes must be positive: {:?}",
                self
            )));
        }
        Ok(())
    }
}
