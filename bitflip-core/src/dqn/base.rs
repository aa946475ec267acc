//! DQN agent.
use super::{
    config::DqnConfig,
    explorer::EpsilonGreedy,
    target::{argmax, double_dqn_targets},
};
use crate::{
    error::BitFlipError,
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Agent, Configurable, ExperienceBufferBase, GoalObs, Policy, ReplayBufferBase, TdBatch,
    ValueFunction,
};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};
use serde::de::DeserializeOwned;
use std::slice;

/// Double DQN agent on a goal-conditioned environment.
///
/// The agent owns an online action-value function, trained on every
/// optimization step, and a target action-value function, which is a hard
/// copy of the online one taken at construction and then every
/// `target_sync_interval` optimization steps.
pub struct Dqn<Q: ValueFunction> {
    qnet: Q,
    qnet_tgt: Q,
    batch_size: usize,
    discount_factor: f64,
    explorer: EpsilonGreedy,
    target_sync_interval: usize,
    n_opts: usize,
    train: bool,
    rng: StdRng,
}

/// `argmax_a Q(s, g, a)` for a single observation.
fn greedy_action<Q: ValueFunction>(qnet: &Q, obs: &GoalObs) -> Result<usize> {
    let q = qnet.predict(slice::from_ref(&obs.state), slice::from_ref(&obs.goal))?;
    Ok(argmax(q.row(0)))
}

impl<Q: ValueFunction> Dqn<Q> {
    /// Returns the online action-value function.
    pub fn qnet(&self) -> &Q {
        &self.qnet
    }

    /// Returns the target action-value function.
    pub fn qnet_tgt(&self) -> &Q {
        &self.qnet_tgt
    }

    /// The number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Returns the explorer.
    pub fn explorer(&self) -> &EpsilonGreedy {
        &self.explorer
    }

    /// Overwrites the target action-value function with the online one.
    pub fn sync_target(&mut self) -> Result<()> {
        self.qnet_tgt.copy_from(&self.qnet)
    }

    /// Computes `r + gamma * q_tgt(s', g, argmax_a q(s', g, a)) * (1 - done)`
    /// for every transition of the batch.
    pub fn compute_targets(&self, batch: &TransitionBatch) -> Result<Vec<f32>> {
        let next_q = self.qnet.predict(&batch.next_state, &batch.goal)?;
        let next_q_tgt = self.qnet_tgt.predict(&batch.next_state, &batch.goal)?;
        Ok(double_dqn_targets(
            &batch.reward,
            &batch.is_done,
            &next_q,
            &next_q_tgt,
            self.discount_factor,
        ))
    }

    /// One gradient step on the TD error of the batch. Returns the loss.
    fn update_critic(&mut self, batch: &TransitionBatch) -> Result<f32> {
        let targets = self.compute_targets(batch)?;
        let loss = self.qnet.train_step(&TdBatch {
            states: &batch.state,
            goals: &batch.goal,
            actions: &batch.act,
            targets: &targets,
        })?;

        if !loss.is_finite() {
            return Err(BitFlipError::NonFiniteLoss(loss).into());
        }
        Ok(loss)
    }
}

impl<Q: ValueFunction> Configurable for Dqn<Q>
where
    Q::Config: DeserializeOwned,
{
    type Config = DqnConfig<Q::Config>;

    /// Constructs DQN agent.
    ///
    /// Both action-value functions are built from the same configuration, then
    /// the target is overwritten with the online parameters.
    fn build(config: Self::Config) -> Result<Self> {
        config.validate()?;
        let qnet = Q::build(&config.q_config)?;
        if qnet.n_actions() == 0 {
            return Err(BitFlipError::InvalidConfig(
                "the action-value function has no actions".to_string(),
            )
            .into());
        }
        let mut qnet_tgt = Q::build(&config.q_config)?;
        qnet_tgt.copy_from(&qnet)?;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            explorer: config.explorer,
            target_sync_interval: config.target_sync_interval,
            n_opts: 0,
            train: true,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }
}

impl<Q: ValueFunction> Policy for Dqn<Q> {
    /// Epsilon-greedy in training mode, greedy in evaluation mode.
    fn sample(&mut self, obs: &GoalObs) -> Result<usize> {
        let qnet = &self.qnet;
        if self.train {
            let n_actions = qnet.n_actions();
            self.explorer
                .action(n_actions, &mut self.rng, || greedy_action(qnet, obs))
        } else {
            greedy_action(qnet, obs)
        }
    }
}

impl<Q, R> Agent<R> for Dqn<Q>
where
    Q: ValueFunction,
    R: ReplayBufferBase<Batch = TransitionBatch> + ExperienceBufferBase,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>> {
        if buffer.len() < self.batch_size {
            trace!(
                "Skip optimization: {} transitions < batch size {}",
                buffer.len(),
                self.batch_size
            );
            return Ok(None);
        }

        let batch = buffer.batch(self.batch_size)?;
        let loss = self.update_critic(&batch)?;
        self.n_opts += 1;

        let mut record = Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            ("eps", RecordValue::Scalar(self.explorer.eps() as f32)),
        ]);

        if self.target_sync_interval > 0 && self.n_opts % self.target_sync_interval == 0 {
            self.sync_target()?;
            debug!("Synchronized target network at opt step {}", self.n_opts);
            record.insert("target_sync", RecordValue::Scalar(self.n_opts as f32));
        }

        Ok(Some(record))
    }
}
