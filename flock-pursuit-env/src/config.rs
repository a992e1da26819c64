//! Configuration of [`PursuitEnv`](crate::PursuitEnv).
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    f64::consts::PI,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PursuitEnv`](crate::PursuitEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PursuitEnvConfig {
    /// Number of birds, the pursuer included.
    pub n_birds: usize,

    /// Side of the periodic square arena.
    pub arena_size: f64,

    /// Distance travelled by a bird in one step.
    pub speed: f64,

    /// Heading change of a left or right turn, in radians.
    pub steering_angle: f64,

    /// An evader closer than this to the pursuer is captured.
    pub capture_range: f64,
}

impl Default for PursuitEnvConfig {
    fn default() -> Self {
        Self {
            n_birds: 100,
            arena_size: 10.0,
            speed: 0.1,
            steering_angle: PI / 6.0,
            capture_range: 0.3,
        }
    }
}

impl PursuitEnvConfig {
    /// Sets the number of birds.
    pub fn n_birds(mut self, v: usize) -> Self {
        self.n_birds = v;
        self
    }

    /// Sets the side of the arena.
    pub fn arena_size(mut self, v: f64) -> Self {
        self.arena_size = v;
        self
    }

    /// Sets the speed.
    pub fn speed(mut self, v: f64) -> Self {
        self.speed = v;
        self
    }

    /// Sets the steering angle.
    pub fn steering_angle(mut self, v: f64) -> Self {
        self.steering_angle = v;
        self
    }

    /// Sets the capture range.
    pub fn capture_range(mut self, v: f64) -> Self {
        self.capture_range = v;
        self
    }

    /// Constructs [`PursuitEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of pursuit env from {}", path_.display());
        Ok(b)
    }

    /// Saves [`PursuitEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of pursuit env into {}", path_.display());
        Ok(())
    }
}

/// Configuration of the sector observers of a flock.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SectorObserverConfig {
    /// Number of sectors around each bird.
    pub n_sectors: usize,

    /// Measure sector angles from the bird's heading instead of the arena x-axis.
    pub directed: bool,

    /// Vision range of the pursuer, unlimited if `None`.
    pub pursuer_vision_range: Option<f64>,

    /// Vision range of the evaders, unlimited if `None`.
    pub evader_vision_range: Option<f64>,
}

impl Default for SectorObserverConfig {
    fn default() -> Self {
        Self {
            n_sectors: 5,
            directed: true,
            pursuer_vision_range: None,
            evader_vision_range: Some(5.0),
        }
    }
}

impl SectorObserverConfig {
    /// Sets the number of sectors.
    pub fn n_sectors(mut self, v: usize) -> Self {
        self.n_sectors = v;
        self
    }

    /// Sets whether sectors follow the heading.
    pub fn directed(mut self, v: bool) -> Self {
        self.directed = v;
        self
    }

    /// Sets the vision range of the pursuer.
    pub fn pursuer_vision_range(mut self, v: Option<f64>) -> Self {
        self.pursuer_vision_range = v;
        self
    }

    /// Sets the vision range of the evaders.
    pub fn evader_vision_range(mut self, v: Option<f64>) -> Self {
        self.evader_vision_range = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_pursuit_env_config() -> Result<()> {
        let config = PursuitEnvConfig::default().n_birds(3).arena_size(4.0);
        let dir = TempDir::new("pursuit_env_config")?;
        let path = dir.path().join("pursuit_env_config.yaml");
        config.save(&path)?;
        assert_eq!(config, PursuitEnvConfig::load(&path)?);
        Ok(())
    }
}
