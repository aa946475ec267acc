//! A fixed-capacity replay buffer with uniform sampling.
mod base;
mod batch;
mod config;
pub use base::SimpleReplayBuffer;
pub use batch::{Transition, TransitionBatch};
pub use config::SimpleReplayBufferConfig;
