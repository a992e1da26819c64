//! Tabular actor-critic training of pursuit-evasion flocks.
//!
//! Flock consists of the following crates:
//!
//! * [flock-core](flock_core) provides the state index codec, the value
//!   tables, the Boltzmann policy, the autocurriculum signal and the trainer
//!   running the actor-critic loop over any environment implementing
//!   [`Env`](flock_core::Env).
//! * [flock-pursuit-env](flock_pursuit_env) is a periodic arena where bird `0`
//!   chases the others, with sector observers for each bird.
//! * This crate writes training records into CSV files with [`CsvRecorder`]
//!   and hosts the `pursuit_evasion` example.
mod csv_recorder;
pub use csv_recorder::{CsvRecorder, RunInfo};
pub use flock_core;
pub use flock_pursuit_env;
