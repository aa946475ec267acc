//! Configuration of [`BitFlipEnv`](super::BitFlipEnv).
use anyhow::Result;
use bitflip_core::error::BitFlipError;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`BitFlipEnv`](super::BitFlipEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BitFlipEnvConfig {
    /// Length of the state and goal bit-vectors, also the number of actions.
    pub num_bits: usize,
}

impl Default for BitFlipEnvConfig {
    fn default() -> Self {
        Self { num_bits: 11 }
    }
}

impl BitFlipEnvConfig {
    /// Sets the number of bits.
    pub fn num_bits(mut self, v: usize) -> Self {
        self.num_bits = v;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), BitFlipError> {
        if self.num_bits == 0 {
            return Err(BitFlipError::InvalidConfig(
                "num_bits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`BitFlipEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`BitFlipEnvConfig`].
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
    fn test_serde_env_config() -> Result<()> {
        let config = BitFlipEnvConfig::default().num_bits(7);
        let dir = TempDir::new("env_config")?;
        let path = dir.path().join("env_config.yaml");
        config.save(&path)?;
        assert_eq!(BitFlipEnvConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(BitFlipEnvConfig::default().validate().is_ok());
        assert!(BitFlipEnvConfig::default().num_bits(0).validate().is_err());
    }
}
