//! Goal-conditioned bit-flipping with double DQN.
//!
//! The workspace consists of the following crates:
//!
//! * [bitflip-core](bitflip_core) provides the traits connecting environments,
//!   replay buffers and agents, the ring replay buffer, the double DQN agent,
//!   the training loop and records.
//! * [bitflip-env](bitflip_env) is the bit-flipping environment.
//! * [bitflip-candle-agent](bitflip_candle_agent) is an action-value function
//!   based on [candle](https://crates.io/crates/candle-core).
//!
//! This crate wires them together: [`DqnBitFlipConfig`] holds the
//! configuration of a whole run, [`train_dqn`] executes it and [`evaluate`]
//! runs a policy without learning.
mod experiment;
pub use bitflip_candle_agent as candle_agent;
pub use bitflip_core as core;
pub use bitflip_env as env;
pub use experiment::{evaluate, train_dqn, DqnBitFlipConfig};
