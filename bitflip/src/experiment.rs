//! Configuration and execution of a training run.
use anyhow::Result;
use bitflip_core::{
    dqn::{Dqn, DqnConfig},
    error::BitFlipError,
    record::AggregateRecorder,
    replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
    Configurable, Env, EpisodeStats, Policy, ReplayBufferBase, TrainSummary, Trainer,
    TrainerConfig, ValueFunction,
};
use bitflip_env::{BitFlipEnv, BitFlipEnvConfig};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of a training run of [`Dqn`] on [`BitFlipEnv`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnBitFlipConfig<C> {
    /// Environment.
    pub env_config: BitFlipEnvConfig,

    /// Seed of the environment.
    pub env_seed: u64,

    /// Replay buffer.
    pub replay_buffer_config: SimpleReplayBufferConfig,

    /// Agent, including its action-value function.
    pub agent_config: DqnConfig<C>,

    /// Training loop.
    pub trainer_config: TrainerConfig,
}

impl<C> DqnBitFlipConfig<C> {
    /// Default components for `num_bits` bits and the given action-value function.
    pub fn new(num_bits: usize, q_config: C) -> Self {
        Self {
            env_config: BitFlipEnvConfig::default().num_bits(num_bits),
            env_seed: 0,
            replay_buffer_config: SimpleReplayBufferConfig::default(),
            agent_config: DqnConfig::new(q_config),
            trainer_config: TrainerConfig::default(),
        }
    }

    /// Sets the seed of the environment.
    pub fn env_seed(mut self, v: u64) -> Self {
        self.env_seed = v;
        self
    }

    /// Sets the replay buffer configuration.
    pub fn replay_buffer_config(mut self, v: SimpleReplayBufferConfig) -> Self {
        self.replay_buffer_config = v;
        self
    }

    /// Sets the agent configuration.
    pub fn agent_config(mut self, v: DqnConfig<C>) -> Self {
        self.agent_config = v;
        self
    }

    /// Sets the trainer configuration.
    pub fn trainer_config(mut self, v: TrainerConfig) -> Self {
        self.trainer_config = v;
        self
    }
}

impl<C> DqnBitFlipConfig<C>
where
    C: DeserializeOwned + Serialize,
{
    /// Constructs [`DqnBitFlipConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnBitFlipConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Builds every component of `config` and trains the agent.
///
/// Returns the trained agent, still in training mode, and the summary of the run.
pub fn train_dqn<Q>(
    config: &DqnBitFlipConfig<Q::Config>,
    recorder: &mut dyn AggregateRecorder,
) -> Result<(Dqn<Q>, TrainSummary)>
where
    Q: ValueFunction,
    Q::Config: DeserializeOwned,
{
    let env = BitFlipEnv::build(&config.env_config, config.env_seed)?;
    let mut buffer = SimpleReplayBuffer::build(&config.replay_buffer_config)?;
    let mut agent = Dqn::<Q>::build(config.agent_config.clone())?;
    let mut trainer = Trainer::build(config.trainer_config.clone())?;

    if agent.qnet().n_actions() != env.n_actions() {
        return Err(BitFlipError::InvalidConfig(format!(
            "the action-value function has {} outputs for {} actions",
            agent.qnet().n_actions(),
            env.n_actions()
        ))
        .into());
    }

    let summary = trainer.train(env, &mut agent, &mut buffer, recorder)?;
    info!(
        "Finished training: {} episodes, {} frames, {} successes",
        summary.n_episodes(),
        summary.frames,
        summary.n_successes
    );

    Ok((agent, summary))
}

/// Runs `n_episodes` episodes with `policy` without storing transitions.
///
/// Set an agent to evaluation mode beforehand to act greedily.
pub fn evaluate<E, P>(env: &mut E, policy: &mut P, n_episodes: usize) -> Result<Vec<EpisodeStats>>
where
    E: Env,
    P: Policy,
{
    let mut episodes = Vec::with_capacity(n_episodes);
    for _ in 0..n_episodes {
        let mut obs = env.reset()?;
        let mut stats = EpisodeStats {
            total_reward: 0.0,
            n_steps: 0,
            is_success: false,
        };
        loop {
            let act = policy.sample(&obs)?;
            let step = env.step(act)?;
            stats.total_reward += step.reward;
            stats.n_steps += 1;
            if step.is_done() {
                stats.is_success = step.is_terminated;
                break;
            }
            obs.state = step.next_state;
        }
        episodes.push(stats);
    }
    Ok(episodes)
}
