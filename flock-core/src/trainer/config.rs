//! Configuration of [`Trainer`](super::Trainer).
use crate::{error::FlockError, ActiveLearner, TrainingSignal};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Which birds are updated at each step.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum UpdateMode {
    /// Value and policy of the birds selected by the [`TrainingSignal`] only.
    Autocurriculum,

    /// Value and policy of every bird at every step. The signal is still
    /// reported in episode summaries but does not gate updates.
    AllAgents,
}

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of episodes.
    pub n_episodes: usize,

    /// The maximum number of steps in an episode.
    pub episode_length: usize,

    /// Learning rate of the value tables.
    pub value_learning_rate: f64,

    /// Learning rate of the policy weights.
    pub policy_learning_rate: f64,

    /// Discount factor of the bootstrapped TD target.
    pub discount_factor: f64,

    /// Which birds are updated.
    pub update_mode: UpdateMode,

    /// Episode thresholds of the autocurriculum.
    pub learner_thresholds: Vec<usize>,

    /// Alternate the learner at every threshold instead of switching once.
    #[serde(default)]
    pub alternate_learners: bool,

    /// Learner once all thresholds are crossed.
    pub learner_after_thresholds: ActiveLearner,

    /// Interval of table snapshots in episodes, `0` disables snapshots.
    pub snapshot_interval: usize,

    /// Interval of trajectory recording in episodes, `0` disables it.
    pub trajectory_interval: usize,

    /// Policy weights are drawn from `[-init_weight_scale, init_weight_scale)`.
    #[serde(default)]
    pub init_weight_scale: f64,

    /// Compute per-bird actions and observations on worker threads.
    #[serde(default)]
    pub parallel: bool,

    /// Seed of action sampling.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 10_000,
            episode_length: 500,
            value_learning_rate: 0.01,
            policy_learning_rate: 0.0001,
            discount_factor: 1.0,
            update_mode: UpdateMode::Autocurriculum,
            learner_thresholds: vec![5_000],
            alternate_learners: false,
            learner_after_thresholds: ActiveLearner::Evaders,
            snapshot_interval: 1_000,
            trajectory_interval: 1_000,
            init_weight_scale: 0.0,
            parallel: false,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn episode_length(mut self, v: usize) -> Self {
        self.episode_length = v;
        self
    }

    /// Sets the learning rate of the value tables.
    pub fn value_learning_rate(mut self, v: f64) -> Self {
        self.value_learning_rate = v;
        self
    }

    /// Sets the learning rate of the policy weights.
    pub fn policy_learning_rate(mut self, v: f64) -> Self {
        self.policy_learning_rate = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the update mode.
    pub fn update_mode(mut self, v: UpdateMode) -> Self {
        self.update_mode = v;
        self
    }

    /// Sets the autocurriculum thresholds.
    pub fn learner_thresholds(mut self, v: Vec<usize>) -> Self {
        self.learner_thresholds = v;
        self
    }

    /// Alternate the learner at every threshold.
    pub fn alternate_learners(mut self, v: bool) -> Self {
        self.alternate_learners = v;
        self
    }

    /// Sets the learner once all thresholds are crossed.
    pub fn learner_after_thresholds(mut self, v: ActiveLearner) -> Self {
        self.learner_after_thresholds = v;
        self
    }

    /// Sets the interval of table snapshots in episodes.
    pub fn snapshot_interval(mut self, v: usize) -> Self {
        self.snapshot_interval = v;
        self
    }

    /// Sets the interval of trajectory recording in episodes.
    pub fn trajectory_interval(mut self, v: usize) -> Self {
        self.trajectory_interval = v;
        self
    }

    /// Sets the scale of the initial policy weights.
    pub fn init_weight_scale(mut self, v: f64) -> Self {
        self.init_weight_scale = v;
        self
    }

    /// Enables per-bird parallelism.
    pub fn parallel(mut self, v: bool) -> Self {
        self.parallel = v;
        self
    }

    /// Sets the seed of action sampling.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Builds the [`TrainingSignal`] described by this configuration.
    pub fn training_signal(&self) -> Result<TrainingSignal, FlockError> {
        Ok(TrainingSignal::new(self.learner_thresholds.clone())?
            .alternate(self.alternate_learners)
            .after(self.learner_after_thresholds))
    }

    /// Checks the values that would break the update rules.
    pub fn validate(&self) -> Result<(), FlockError> {
        let rates = [
            ("value_learning_rate", self.value_learning_rate),
            ("policy_learning_rate", self.policy_learning_rate),
            ("init_weight_scale", self.init_weight_scale),
        ];
        for (name, v) in rates.iter() {
            if !v.is_finite() || *v < 0.0 {
                return Err(FlockError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, v
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(FlockError::InvalidConfig(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if self.episode_length == 0 {
            return Err(FlockError::InvalidConfig(
                "episode_length must be positive".to_string(),
            ));
        }
        self.training_signal().map(|_| ())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of trainer from {}", path_.display());
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of trainer into {}", path_.display());
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
            .n_episodes(100)
            .episode_length(50)
            .learner_thresholds(vec![10, 20])
            .update_mode(UpdateMode::AllAgents)
            .parallel(true);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(TrainerConfig::default().validate().is_ok());
        assert!(TrainerConfig::default()
            .discount_factor(1.5)
            .validate()
            .is_err());
        assert!(TrainerConfig::default()
            .value_learning_rate(f64::NAN)
            .validate()
            .is_err());
        assert!(TrainerConfig::default()
            .episode_length(0)
            .validate()
            .is_err());
        assert!(TrainerConfig::default()
            .learner_thresholds(vec![3, 2])
            .validate()
            .is_err());
    }
}
