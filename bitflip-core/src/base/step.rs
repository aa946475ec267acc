//! Environment step.
use super::{Bits, Env};

/// Additional information to the next state and reward.
pub trait Info {}

impl Info for () {}

/// Represents an action, next state and reward tuple `(a_t, s_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
/// Together with the previous state and the goal of the episode, this object
/// is used to create transitions `(s_t, a_t, r_t, s_t+1, done_t, g)`.
pub struct Step<E: Env> {
    /// Action.
    pub act: usize,

    /// Next state, a copy of the environment's state after the action.
    pub next_state: Bits,

    /// Reward.
    pub reward: f32,

    /// The episode ended because the goal was reached.
    pub is_terminated: bool,

    /// The episode ended because of the episode-length cap.
    pub is_truncated: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        act: usize,
        next_state: Bits,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            next_state,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
