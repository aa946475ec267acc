//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum BitFlipError {
    /// An environment step was requested after the episode had terminated.
    #[error("step() called on a terminated episode; call reset() first")]
    InvalidState,

    /// More transitions were requested than the replay buffer holds.
    #[error("requested {requested} transitions, but only {available} are stored")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,
        /// Number of stored transitions.
        available: usize,
    },

    /// An action index outside of `[0, num_actions)`.
    #[error("action {action} is out of range for {num_actions} actions")]
    InvalidAction {
        /// The given action.
        action: usize,
        /// The number of actions.
        num_actions: usize,
    },

    /// Malformed configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The TD loss diverged.
    #[error("Non-finite loss: {0}")]
    NonFiniteLoss(f32),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
