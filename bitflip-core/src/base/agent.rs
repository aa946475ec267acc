//! Agent.
use super::{Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;

/// Represents a trainable policy.
pub trait Agent<R: ReplayBufferBase>: Policy {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters. Returns `Ok(None)` if the step was
    /// skipped, for example because the buffer does not hold enough
    /// transitions yet.
    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>>;
}
