//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
mod value_function;
pub use agent::Agent;
pub use env::Env;
pub use policy::{Configurable, Policy};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use step::{Info, Step};
pub use value_function::{TdBatch, ValueFunction};

/// A bit-vector. Every element is either `0` or `1`.
pub type Bits = Vec<u8>;

/// Observation of a goal-conditioned environment.
///
/// Both fields are owned copies; mutating them never affects the environment
/// that produced the observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalObs {
    /// Current state.
    pub state: Bits,

    /// Goal of the episode.
    pub goal: Bits,
}

impl GoalObs {
    /// Constructs an observation.
    pub fn new(state: Bits, goal: Bits) -> Self {
        Self { state, goal }
    }
}
