//! Deterministic stand-ins used in tests.
use crate::{Bits, TdBatch, ValueFunction};
use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Configuration of [`DummyValueFunction`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DummyValueFunctionConfig {
    /// Initial action values, one per action.
    pub values: Vec<f32>,

    /// Step size of [`ValueFunction::train_step`]. `0.0` freezes the values.
    pub learning_rate: f32,
}

impl DummyValueFunctionConfig {
    /// Frozen action values.
    pub fn frozen(values: Vec<f32>) -> Self {
        Self {
            values,
            learning_rate: 0.0,
        }
    }
}

/// An action-value function ignoring its input.
///
/// Every row returned by [`ValueFunction::predict`] equals the current
/// `values`. A training step moves `values[a_i]` towards `target_i` for each
/// element of the batch in order.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyValueFunction {
    values: Vec<f32>,
    learning_rate: f32,
    n_train_steps: usize,
    last_targets: Vec<f32>,
}

impl DummyValueFunction {
    /// Current action values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// The number of calls of [`ValueFunction::train_step`].
    pub fn n_train_steps(&self) -> usize {
        self.n_train_steps
    }

    /// Targets given to the last training step.
    pub fn last_targets(&self) -> &[f32] {
        &self.last_targets
    }
}

impl ValueFunction for DummyValueFunction {
    type Config = DummyValueFunctionConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self {
            values: config.values.clone(),
            learning_rate: config.learning_rate,
            n_train_steps: 0,
            last_targets: vec![],
        })
    }

    fn n_actions(&self) -> usize {
        self.values.len()
    }

    fn predict(&self, states: &[Bits], _goals: &[Bits]) -> Result<Array2<f32>> {
        let n = states.len();
        let data = (0..n).flat_map(|_| self.values.iter().copied()).collect();
        Ok(Array2::from_shape_vec((n, self.values.len()), data)?)
    }

    fn train_step(&mut self, batch: &TdBatch) -> Result<f32> {
        let loss = batch
            .actions
            .iter()
            .zip(batch.targets.iter())
            .map(|(&a, &t)| (self.values[a] - t).powi(2))
            .sum::<f32>()
            / batch.len() as f32;

        for (&a, &t) in batch.actions.iter().zip(batch.targets.iter()) {
            self.values[a] += self.learning_rate * (t - self.values[a]);
        }
        self.n_train_steps += 1;
        self.last_targets = batch.targets.to_vec();

        Ok(loss)
    }

    fn copy_from(&mut self, src: &Self) -> Result<()> {
        self.values.clone_from(&src.values);
        Ok(())
    }
}
