//! Double DQN agent.
mod base;
mod config;
mod explorer;
mod target;
pub use base::Dqn;
pub use config::DqnConfig;
pub use explorer::EpsilonGreedy;
pub use target::{argmax, double_dqn_targets, expected_q_value};
