//! Goal-conditioned bit-flipping environment.
//!
//! The state and the goal are bit-vectors of length `num_bits`. An action
//! `i` flips the `i`-th bit of the state. The reward is `0` when the state
//! equals the goal after the flip and `-1` otherwise; the episode ends when the
//! goal is reached or after `num_bits + 2` actions.
//!
//! ```
//! use anyhow::Result;
//! use bitflip_core::Env as _;
//! use bitflip_env::{BitFlipEnv, BitFlipEnvConfig};
//!
//! fn main() -> Result<()> {
//!     let config = BitFlipEnvConfig::default().num_bits(4);
//!     let mut env = BitFlipEnv::build(&config, 42)?;
//!     let obs = env.reset()?;
//!
//!     // Flip every bit that differs from the goal
//!     let mut last = None;
//!     for i in 0..4 {
//!         if obs.state[i] != obs.goal[i] {
//!             last = Some(env.step(i)?);
//!         }
//!     }
//!     if let Some(step) = last {
//!         assert_eq!(step.reward, 0.0);
//!         assert!(step.is_terminated);
//!     }
//!     Ok(())
//! }
//! ```
mod config;
mod env;
pub use config::BitFlipEnvConfig;
pub use env::{BitFlipEnv, BitFlipInfo};
