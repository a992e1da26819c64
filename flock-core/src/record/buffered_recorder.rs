use super::{EpisodeSummary, Recorder, TableSnapshot};
use anyhow::Result;

/// Buffered recorder.
///
/// Keeps every record in memory. This is used for tests and for short runs
/// whose outputs are inspected programmatically.
#[derive(Debug, Clone)]
pub struct BufferedRecorder<S> {
    trajectories: Vec<(usize, S)>,
    episodes: Vec<EpisodeSummary>,
    snapshots: Vec<TableSnapshot>,
}

impl<S> Default for BufferedRecorder<S> {
    fn default() -> Self {
        Self {
            trajectories: Vec::new(),
            episodes: Vec::new(),
            snapshots: Vec::new(),
        }
    }
}

impl<S> BufferedRecorder<S> {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded states with their episode number.
    pub fn trajectories(&self) -> &[(usize, S)] {
        &self.trajectories
    }

    /// Recorded episode summaries.
    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }

    /// Recorded table snapshots.
    pub fn snapshots(&self) -> &[TableSnapshot] {
        &self.snapshots
    }
}

impl<S: Clone> Recorder<S> for BufferedRecorder<S> {
    fn record_trajectory(&mut self, episode: usize, state: &S) -> Result<()> {
        self.trajectories.push((episode, state.clone()));
        Ok(())
    }

    fn record_episode(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes.push(summary.clone());
        Ok(())
    }

    fn record_snapshot(&mut self, snapshot: &TableSnapshot) -> Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}
