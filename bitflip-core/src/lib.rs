#![warn(missing_docs)]
//! Core components for training a goal-conditioned agent with double DQN.
//!
//! * [`Env`] is a goal-conditioned environment with discrete actions.
//! * [`replay_buffer::SimpleReplayBuffer`] stores transitions in a ring and
//!   samples batches uniformly without replacement.
//! * [`ValueFunction`] is the interface of the action-value function approximator.
//! * [`dqn::Dqn`] selects actions epsilon-greedily and minimizes the TD error
//!   with double DQN targets and a hard-synchronized target network.
//! * [`Trainer`] runs the episode loop.
pub mod dqn;
pub mod dummy;
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Agent, Bits, Configurable, Env, ExperienceBufferBase, GoalObs, Info, Policy,
    ReplayBufferBase, Step, TdBatch, ValueFunction,
};

mod trainer;
pub use trainer::{EpisodeStats, Sampler, TrainSummary, Trainer, TrainerConfig};
