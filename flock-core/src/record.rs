//! Types and traits for recording the outputs of training.
//!
//! The trainer produces three kinds of output:
//!
//! * trajectory records `(episode, state)` for every step of selected episodes,
//! * an [`EpisodeSummary`] for every episode,
//! * periodic [`TableSnapshot`]s holding, for each agent and each state index,
//!   the state value and the policy weight of every action.
//!
//! They are handed to a [`Recorder`]. [`BufferedRecorder`] keeps them in memory
//! and [`NullRecorder`] discards them. Writing to files is left to
//! implementations outside this crate.
//!
//! # Basic Usage
//!
//! ```rust
//! use flock_core::record::{BufferedRecorder, EpisodeSummary, Recorder};
//! use flock_core::ActiveLearner;
//!
//! let mut recorder = BufferedRecorder::<()>::new();
//! let summary = EpisodeSummary {
//!     episode: 0,
//!     steps: 12,
//!     active_learner: ActiveLearner::Pursuer,
//!     terminated: true,
//! };
//! recorder.record_episode(&summary).unwrap();
//! assert_eq!(recorder.episodes().len(), 1);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{AgentTables, EpisodeSummary, TableSnapshot};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
