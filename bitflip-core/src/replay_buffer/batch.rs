//! Transitions and batches of them.
use crate::Bits;

/// A transition `(s_t, a_t, r_t, s_t+1, done_t, g)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// State before the action.
    pub state: Bits,

    /// Action.
    pub act: usize,

    /// Reward.
    pub reward: f32,

    /// State after the action.
    pub next_state: Bits,

    /// Whether the episode ended with this transition.
    pub is_done: bool,

    /// Goal of the episode.
    pub goal: Bits,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(
        state: Bits,
        act: usize,
        reward: f32,
        next_state: Bits,
        is_done: bool,
        goal: Bits,
    ) -> Self {
        Self {
            state,
            act,
            reward,
            next_state,
            is_done,
            goal,
        }
    }
}

/// Transitions regrouped by field.
///
/// The `i`-th elements of all fields come from the same transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionBatch {
    /// States `s_t`.
    pub state: Vec<Bits>,

    /// Actions `a_t`.
    pub act: Vec<usize>,

    /// Rewards `r_t`.
    pub reward: Vec<f32>,

    /// Next states `s_t+1`.
    pub next_state: Vec<Bits>,

    /// Done flags, `1` if the episode ended.
    pub is_done: Vec<i8>,

    /// Goals.
    pub goal: Vec<Bits>,

    /// Indices of the sampled transitions in the buffer.
    pub ix_sample: Vec<usize>,
}

impl TransitionBatch {
    /// Creates an empty batch with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
            reward: Vec::with_capacity(capacity),
            next_state: Vec::with_capacity(capacity),
            is_done: Vec::with_capacity(capacity),
            goal: Vec::with_capacity(capacity),
            ix_sample: Vec::with_capacity(capacity),
        }
    }

    /// Appends a copy of `tr`, sampled from index `ix`.
    pub fn push(&mut self, ix: usize, tr: &Transition) {
        self.state.push(tr.state.clone());
        self.act.push(tr.act);
        self.reward.push(tr.reward);
        self.next_state.push(tr.next_state.clone());
        self.is_done.push(tr.is_done as i8);
        self.goal.push(tr.goal.clone());
        self.ix_sample.push(ix);
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.act.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.act.is_empty()
    }
}
