//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    replay_buffer::Transition,
    Agent, Env, ExperienceBufferBase, ReplayBufferBase,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::info;
pub use sampler::Sampler;

/// Outcome of a single episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeStats {
    /// Sum of rewards.
    pub total_reward: f32,

    /// The number of environment steps.
    pub n_steps: usize,

    /// The episode ended by reaching the goal.
    pub is_success: bool,
}

/// What happened in [`Trainer::train`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainSummary {
    /// The number of environment steps.
    pub frames: usize,

    /// Total reward of every episode, in order.
    pub episode_rewards: Vec<f32>,

    /// Length of every episode, in order.
    pub episode_lengths: Vec<usize>,

    /// Loss of every optimization step, in order.
    pub losses: Vec<f32>,

    /// The number of episodes ending at the goal.
    pub n_successes: usize,
}

fn mean(vs: &[f32]) -> Option<f32> {
    if vs.is_empty() {
        None
    } else {
        Some(vs.iter().sum::<f32>() / vs.len() as f32)
    }
}

impl TrainSummary {
    /// The number of episodes.
    pub fn n_episodes(&self) -> usize {
        self.episode_rewards.len()
    }

    /// Mean total reward of the latest `window` episodes.
    pub fn mean_reward(&self, window: usize) -> Option<f32> {
        let n = self.episode_rewards.len();
        mean(&self.episode_rewards[n.saturating_sub(window)..])
    }

    /// Mean loss over all optimization steps.
    pub fn mean_loss(&self) -> Option<f32> {
        mean(&self.losses)
    }

    fn push(&mut self, episode: &EpisodeStats) {
        self.frames += episode.n_steps;
        self.episode_rewards.push(episode.total_reward);
        self.episode_lengths.push(episode.n_steps);
        if episode.is_success {
            self.n_successes += 1;
        }
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// 1. Reset the environment, drawing a new state and goal.
/// 2. Repeat until the episode ends: sample an action with the agent, step the
///    environment, push the transition `(s_t, a_t, r_t, s_t+1, done_t, g)` into
///    the replay buffer.
/// 3. Do one optimization step of the agent. The agent skips it while the
///    buffer holds fewer transitions than its batch size.
/// 4. Store a record of the episode. Every `record_interval` episodes, log the
///    mean reward of the latest `reward_window` episodes and the mean loss,
///    and flush the recorder.
/// 5. Back to 1 while the frame budget (and the episode limit, if any) is
///    not exhausted.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|action|B[Env]
///     B -->|Step|C[Sampler]
///     C -->|GoalObs|A
///     C -->|Transition|D[ReplayBuffer]
///     D -->|TransitionBatch|A
/// ```
pub struct Trainer {
    max_frames: usize,
    max_episodes: Option<usize>,
    record_interval: usize,
    reward_window: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_frames: config.max_frames,
            max_episodes: config.max_episodes,
            record_interval: config.record_interval,
            reward_window: config.reward_window,
        })
    }

    fn is_finished(&self, summary: &TrainSummary) -> bool {
        summary.frames >= self.max_frames
            || self
                .max_episodes
                .map_or(false, |max| summary.n_episodes() >= max)
    }

    /// Runs a whole episode, pushing every transition into `buffer`.
    ///
    /// No optimization step is performed.
    pub fn run_episode<E, A, R>(
        sampler: &mut Sampler<E>,
        agent: &mut A,
        buffer: &mut R,
    ) -> Result<EpisodeStats>
    where
        E: Env,
        A: Agent<R>,
        R: ExperienceBufferBase<Item = Transition> + ReplayBufferBase,
    {
        sampler.reset()?;
        let mut stats = EpisodeStats {
            total_reward: 0.0,
            n_steps: 0,
            is_success: false,
        };

        loop {
            let step = sampler.sample_and_push(agent, buffer)?;
            stats.total_reward += step.reward;
            stats.n_steps += 1;
            if step.is_done() {
                stats.is_success = step.is_terminated;
                return Ok(stats);
            }
        }
    }

    /// Train the agent.
    ///
    /// Returns per-episode rewards and per-update losses.
    pub fn train<E, A, R>(
        &mut self,
        env: E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<TrainSummary>
    where
        E: Env,
        A: Agent<R>,
        R: ExperienceBufferBase<Item = Transition> + ReplayBufferBase,
    {
        let mut sampler = Sampler::new(env);
        let mut summary = TrainSummary::default();
        agent.train();

        while !self.is_finished(&summary) {
            let episode = Self::run_episode(&mut sampler, agent, buffer)?;
            summary.push(&episode);

            let mut record = Record::from_slice(&[
                ("episode_reward", Scalar(episode.total_reward)),
                ("episode_steps", Scalar(episode.n_steps as f32)),
            ]);
            if let Some(record_agent) = agent.opt(buffer)? {
                summary.losses.push(record_agent.get_scalar("loss")?);
                record = record.merge(record_agent);
            }

            let n_episodes = summary.n_episodes();
            let is_report = n_episodes % self.record_interval == 0;
            if is_report {
                record.insert("datetime", DateTime(Local::now()));
            }
            recorder.store(record);

            if is_report {
                info!(
                    "episodes: {}, frames: {}, mean reward (last {}): {:.3}, mean loss: {:.5}",
                    n_episodes,
                    summary.frames,
                    self.reward_window,
                    summary.mean_reward(self.reward_window).unwrap_or(f32::NAN),
                    summary.mean_loss().unwrap_or(f32::NAN),
                );
                recorder.flush(n_episodes as i64);
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_reward_uses_latest_window() {
        let summary = TrainSummary {
            episode_rewards: vec![-10.0, -4.0, -2.0, 0.0],
            ..TrainSummary::default()
        };
        assert_eq!(summary.mean_reward(2), Some(-1.0));
        assert_eq!(summary.mean_reward(100), Some(-4.0));
        assert_eq!(TrainSummary::default().mean_reward(10), None);
        assert_eq!(TrainSummary::default().mean_loss(), None);
    }

    #[test]
    fn test_build_rejects_zero_record_interval() {
        assert!(Trainer::build(TrainerConfig::default().record_interval(0)).is_err());
    }
}
