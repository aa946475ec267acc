//! Action-value function of the bit-flipping DQN agent implemented with
//! [candle](https://crates.io/crates/candle-core).
//!
//! [`QNet`] implements [`bitflip_core::ValueFunction`], so it can be plugged
//! into [`bitflip_core::dqn::Dqn`].
pub mod mlp;
pub mod opt;
mod qnet;
pub mod util;
use anyhow::Result;
pub use qnet::{QNet, QNetConfig};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Default)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The GPU device of the given ordinal.
    Cuda(usize),
}

impl Device {
    /// Opens the device.
    pub fn open(self) -> Result<candle_core::Device> {
        match self {
            Self::Cpu => Ok(candle_core::Device::Cpu),
            Self::Cuda(n) => Ok(candle_core::Device::new_cuda(n)?),
        }
    }
}
