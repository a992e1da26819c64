#![warn(missing_docs)]
//! Pursuit-evasion arena for [`flock_core`].
//!
//! [`PursuitEnv`] moves birds on a periodic square arena where bird `0` chases
//! the others. [`SectorObserver`] turns the positions around a bird into an
//! [`Observation`](flock_core::Observation) of sector readings, so that the
//! flock can be trained with [`Trainer`](flock_core::Trainer).
//!
//! ```no_run
//! # use anyhow::Result;
//! use flock_core::{record::NullRecorder, Env, Trainer, TrainerConfig};
//! use flock_pursuit_env::{
//!     sector_codec, sector_observers, PursuitEnv, PursuitEnvConfig, SectorObserverConfig,
//! };
//!
//! # fn main() -> Result<()> {
//! let env_config = PursuitEnvConfig::default().n_birds(10);
//! let obs_config = SectorObserverConfig::default();
//! let mut env = PursuitEnv::build(&env_config, 42)?;
//! let mut trainer = Trainer::<PursuitEnv>::build(
//!     TrainerConfig::default(),
//!     sector_codec(&obs_config)?,
//!     sector_observers(&env_config, &obs_config),
//! )?;
//! trainer.train(&mut env, &mut NullRecorder::new())?;
//! # Ok(())
//! # }
//! ```
mod config;
mod env;
mod geometry;
mod observer;
mod state;
pub use config::{PursuitEnvConfig, SectorObserverConfig};
pub use env::PursuitEnv;
pub use observer::{
    sector_codec, sector_observers, SectorObserver, EMPTY, EVADER, MAX_READING, PURSUER,
};
pub use state::{Bird, State};
