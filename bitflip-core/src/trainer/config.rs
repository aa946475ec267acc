//! Configuration of [`Trainer`](super::Trainer).
use crate::error::BitFlipError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Budget of environment steps.
    ///
    /// Checked between episodes: the episode that exhausts the budget runs
    /// to its end.
    pub max_frames: usize,

    /// Optional limit on the number of episodes.
    #[serde(default)]
    pub max_episodes: Option<usize>,

    /// Interval of flushing records in episodes.
    pub record_interval: usize,

    /// The number of the latest episodes averaged in progress reports.
    pub reward_window: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_frames: 200_000,
            max_episodes: None,
            record_interval: 100,
            reward_window: 100,
        }
    }
}

impl TrainerConfig {
    /// Sets the budget of environment steps.
    pub fn max_frames(mut self, v: usize) -> Self {
        self.max_frames = v;
        self
    }

    /// Sets the limit on the number of episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = Some(v);
        self
    }

    /// Sets the interval of flushing records in episodes.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the number of episodes averaged in progress reports.
    pub fn reward_window(mut self, v: usize) -> Self {
        self.reward_window = v;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), BitFlipError> {
        if self.record_interval == 0 {
            return Err(BitFlipError::InvalidConfig(
                "record_interval must be positive".to_string(),
            ));
        }
        if self.reward_window == 0 {
            return Err(BitFlipError::InvalidConfig(
                "reward_window must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
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
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .max_frames(1000)
            .max_episodes(20)
            .record_interval(5);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_max_episodes_defaults_to_none() -> Result<()> {
        let yaml = "max_frames: 10\nrecord_interval: 1\nreward_window: 1\n";
        let config: TrainerConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.max_episodes, None);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(TrainerConfig::default().validate().is_ok());
        assert!(TrainerConfig::default().record_interval(0).validate().is_err());
        assert!(TrainerConfig::default().reward_window(0).validate().is_err());
    }
}
