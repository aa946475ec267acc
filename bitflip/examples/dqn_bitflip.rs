use anyhow::Result;
use bitflip::{
    candle_agent::{opt::OptimizerConfig, QNet, QNetConfig},
    core::{
        dqn::{Dqn, DqnConfig, EpsilonGreedy},
        record::{AggregateRecorder, LogRecorder},
        replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
        Agent, Env as _, TrainerConfig,
    },
    env::BitFlipEnv,
    evaluate, train_dqn, DqnBitFlipConfig,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Train a DQN agent on the bit-flipping environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Length of the state and goal bit-vectors
    #[arg(long, default_value_t = 11)]
    num_bits: usize,

    /// Capacity of the replay buffer
    #[arg(long, default_value_t = 50_000)]
    capacity: usize,

    /// Batch size of an optimization step
    #[arg(long, default_value_t = 5)]
    batch_size: usize,

    /// Budget of environment steps
    #[arg(long, default_value_t = 200_000)]
    max_frames: usize,

    /// Probability of a random action
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,

    /// Optimization steps between target network syncs, 0 to never sync
    #[arg(long, default_value_t = 50)]
    target_sync_interval: usize,

    /// Discount factor
    #[arg(long, default_value_t = 0.99)]
    discount_factor: f64,

    /// Learning rate of Adam
    #[arg(long, default_value_t = 1e-3)]
    lr: f64,

    /// Episodes between progress reports
    #[arg(long, default_value_t = 100)]
    record_interval: usize,

    /// Greedy episodes run after training
    #[arg(long, default_value_t = 100)]
    eval_episodes: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the configuration of the run to this YAML file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Read the configuration of the run from this YAML file, ignoring other options
    #[arg(long)]
    config: Option<PathBuf>,
}

fn create_config(args: &Args) -> Result<DqnBitFlipConfig<QNetConfig>> {
    if let Some(path) = &args.config {
        return DqnBitFlipConfig::load(path);
    }

    let q_config = QNetConfig::new(args.num_bits).opt_config(OptimizerConfig::Adam { lr: args.lr });
    let agent_config = DqnConfig::new(q_config.clone())
        .batch_size(args.batch_size)
        .discount_factor(args.discount_factor)
        .explorer(EpsilonGreedy::constant(args.epsilon))
        .target_sync_interval(args.target_sync_interval)
        .seed(args.seed);
    let trainer_config = TrainerConfig::default()
        .max_frames(args.max_frames)
        .record_interval(args.record_interval);
    let replay_buffer_config = SimpleReplayBufferConfig::default()
        .capacity(args.capacity)
        .seed(args.seed);

    Ok(DqnBitFlipConfig::new(args.num_bits, q_config)
        .env_seed(args.seed)
        .agent_config(agent_config)
        .replay_buffer_config(replay_buffer_config)
        .trainer_config(trainer_config))
}

fn run(args: &Args, recorder: &mut dyn AggregateRecorder) -> Result<f32> {
    let config = create_config(args)?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
        info!("Saved configuration to {:?}", path);
    }

    let (mut agent, _) = train_dqn::<QNet>(&config, recorder)?;

    let mut env = BitFlipEnv::build(&config.env_config, config.env_seed + 1)?;
    <Dqn<QNet> as Agent<SimpleReplayBuffer>>::eval(&mut agent);
    let episodes = evaluate(&mut env, &mut agent, args.eval_episodes)?;
    let n_successes = episodes.iter().filter(|e| e.is_success).count();
    let success_rate = n_successes as f32 / episodes.len().max(1) as f32;
    info!(
        "Greedy evaluation: {} of {} episodes reached the goal",
        n_successes,
        episodes.len()
    );

    Ok(success_rate)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut recorder = LogRecorder::new();
    run(&args, &mut recorder)?;
    Ok(())
}
