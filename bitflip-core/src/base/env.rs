//! Environment.
use super::{GoalObs, Info, Step};
use anyhow::Result;

/// Represents a goal-conditioned environment with a discrete action space.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode, drawing a fresh state and goal.
    fn reset(&mut self) -> Result<GoalObs>;

    /// Performes an environment step.
    ///
    /// Fails with [`BitFlipError::InvalidState`] if the current episode has
    /// already ended.
    ///
    /// [`BitFlipError::InvalidState`]: crate::error::BitFlipError::InvalidState
    fn step(&mut self, act: usize) -> Result<Step<Self>>
    where
        Self: Sized;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;
}
