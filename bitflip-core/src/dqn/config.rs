//! Configuration of DQN agent.
use super::explorer::EpsilonGreedy;
use crate::error::BitFlipError;
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Dqn`](super::Dqn) agent.
///
/// `C` is the configuration of the action-value function.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnConfig<C> {
    /// Configuration of the online and target action-value functions.
    pub q_config: C,

    /// The number of transitions in a batch for a single update.
    pub batch_size: usize,

    /// Discount factor `gamma`.
    pub discount_factor: f64,

    /// Exploration strategy.
    pub explorer: EpsilonGreedy,

    /// Interval of hard target updates in optimization steps.
    ///
    /// `0` disables resynchronization: the target network keeps the
    /// parameters copied when the agent was built.
    pub target_sync_interval: usize,

    /// Random seed of the explorer.
    pub seed: u64,
}

impl<C: Default> Default for DqnConfig<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> DqnConfig<C> {
    /// Constructs a configuration with default hyperparameters.
    pub fn new(q_config: C) -> Self {
        Self {
            q_config,
            batch_size: 5,
            discount_factor: 0.99,
            explorer: EpsilonGreedy::default(),
            target_sync_interval: 0,
            seed: 42,
        }
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the interval of target network synchronization.
    pub fn target_sync_interval(mut self, v: usize) -> Self {
        self.target_sync_interval = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks hyperparameters of the agent.
    pub fn validate(&self) -> Result<(), BitFlipError> {
        if self.batch_size == 0 {
            return Err(BitFlipError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(BitFlipError::InvalidConfig(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        self.explorer.validate()
    }
}

impl<C> DqnConfig<C>
where
    C: DeserializeOwned + Serialize,
{
    /// Constructs [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_dqn_config() -> Result<()> {
        let config = DqnConfig::new(vec![1.0f32, 2.0])
            .batch_size(32)
            .target_sync_interval(100)
            .explorer(EpsilonGreedy::with_final_step(1000));

        let dir = TempDir::new("dqn_config")?;
        let path = dir.path().join("dqn_config.yaml");
        config.save(&path)?;
        let config_ = DqnConfig::<Vec<f32>>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(DqnConfig::new(()).validate().is_ok());
        assert!(DqnConfig::new(()).batch_size(0).validate().is_err());
        assert!(DqnConfig::new(()).discount_factor(1.5).validate().is_err());
        assert!(DqnConfig::new(())
            .explorer(EpsilonGreedy::constant(2.0))
            .validate()
            .is_err());
    }
}
