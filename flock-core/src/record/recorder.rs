use super::{EpisodeSummary, TableSnapshot};
use anyhow::Result;

/// Receives the outputs of the trainer.
///
/// `S` is the state type of the environment. Persistence is up to the
/// implementation; the trainer only guarantees when and in which order the
/// methods are called:
///
/// * [`Recorder::record_trajectory`] before every step of a recorded episode,
/// * [`Recorder::record_episode`] once after every episode,
/// * [`Recorder::record_snapshot`] after [`Recorder::record_episode`] of a snapshot episode,
/// * [`Recorder::flush`] once at the end of training.
pub trait Recorder<S> {
    /// Records the state at a step of episode `episode`.
    fn record_trajectory(&mut self, episode: usize, state: &S) -> Result<()>;

    /// Records the summary of a finished episode.
    fn record_episode(&mut self, summary: &EpisodeSummary) -> Result<()>;

    /// Records the value and policy tables.
    fn record_snapshot(&mut self, snapshot: &TableSnapshot) -> Result<()>;

    /// Writes buffered data to its destination.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
