//! Goal-conditioned action-value function.
use super::Bits;
use anyhow::Result;
use ndarray::Array2;

/// A regression batch for a single update of an action-value function.
///
/// The `i`-th elements of all fields belong to the same transition.
/// `targets` are constants: no gradient flows through them.
pub struct TdBatch<'a> {
    /// States `s_t`.
    pub states: &'a [Bits],

    /// Goals `g`.
    pub goals: &'a [Bits],

    /// Actions `a_t` taken in `s_t`.
    pub actions: &'a [usize],

    /// Bootstrapped targets for `Q(s_t, g, a_t)`.
    pub targets: &'a [f32],
}

impl<'a> TdBatch<'a> {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A parameterized function `Q(s, g) -> [q_0, ..., q_{n-1}]`.
///
/// The DQN agent owns two instances of the same type: the online function,
/// updated with [`ValueFunction::train_step`], and the target function, updated
/// only through [`ValueFunction::copy_from`].
pub trait ValueFunction {
    /// Configuration from which the function is built.
    type Config: Clone;

    /// Builds a freshly initialized function.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// The number of outputs, i.e., actions.
    fn n_actions(&self) -> usize;

    /// Returns action values of shape `(states.len(), n_actions)`.
    fn predict(&self, states: &[Bits], goals: &[Bits]) -> Result<Array2<f32>>;

    /// Performs one gradient step on the mean squared error between
    /// `Q(s_t, g, a_t)` and the targets, returning the loss before the update.
    fn train_step(&mut self, batch: &TdBatch) -> Result<f32>;

    /// Overwrites all parameters of `self` with those of `src`.
    fn copy_from(&mut self, src: &Self) -> Result<()>;
}
