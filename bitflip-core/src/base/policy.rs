//! Policy.
use super::GoalObs;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A policy on a goal-conditioned environment.
///
/// Policy is a mapping from an observation to an action index.
pub trait Policy {
    /// Sample an action given an observation.
    fn sample(&mut self, obs: &GoalObs) -> Result<usize>;
}

/// A configurable object.
pub trait Configurable {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Build the object with the configuration in the yaml file of the given path.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let file = std::fs::File::open(path)?;
        let rdr = std::io::BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Self::build(config)
    }
}
