//! Exploration strategy of DQN.
use crate::error::BitFlipError;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer for DQN.
///
/// Epsilon decays linearly from `eps_start` to `eps_final` over `final_step`
/// calls of [`EpsilonGreedy::action`]. With `eps_start == eps_final` it is
/// constant.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// The number of actions taken so far.
    #[serde(default)]
    pub n_steps: usize,
    /// Epsilon at the first action.
    pub eps_start: f64,
    /// Epsilon after `final_step` actions.
    pub eps_final: f64,
    /// The number of actions over which epsilon decays.
    pub final_step: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::constant(0.1)
    }
}

impl EpsilonGreedy {
    /// Constructs an explorer with a fixed epsilon.
    pub fn constant(eps: f64) -> Self {
        Self {
            n_steps: 0,
            eps_start: eps,
            eps_final: eps,
            final_step: 0,
        }
    }

    /// Constructs an explorer decaying from 1.0 to `eps_final` in `final_step` actions.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            n_steps: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step,
        }
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Current value of epsilon.
    pub fn eps(&self) -> f64 {
        if self.final_step == 0 {
            return self.eps_final;
        }
        let d = (self.eps_start - self.eps_final) / (self.final_step as f64);
        let eps = self.eps_start - d * self.n_steps as f64;
        if self.eps_start >= self.eps_final {
            eps.max(self.eps_final)
        } else {
            eps.min(self.eps_final)
        }
    }

    /// Checks that both ends of the schedule are probabilities.
    pub fn validate(&self) -> Result<(), BitFlipError> {
        for (name, v) in [("eps_start", self.eps_start), ("eps_final", self.eps_final)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(BitFlipError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }

    /// Takes an action.
    ///
    /// With probability epsilon returns an action drawn uniformly from
    /// `0..n_actions`; otherwise returns `greedy()`, which is evaluated only
    /// in that case.
    pub fn action<F>(&mut self, n_actions: usize, rng: &mut impl Rng, greedy: F) -> Result<usize>
    where
        F: FnOnce() -> Result<usize>,
    {
        let eps = self.eps();
        self.n_steps += 1;

        if rng.gen::<f64>() < eps {
            Ok(rng.gen_range(0..n_actions))
        } else {
            greedy()
        }
    }
}
