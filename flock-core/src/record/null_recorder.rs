use super::{EpisodeSummary, Recorder, TableSnapshot};
use anyhow::Result;

/// A recorder that ignores any record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder {}

impl NullRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self {}
    }
}

impl<S> Recorder<S> for NullRecorder {
    fn record_trajectory(&mut self, _episode: usize, _state: &S) -> Result<()> {
        Ok(())
    }

    fn record_episode(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn record_snapshot(&mut self, _snapshot: &TableSnapshot) -> Result<()> {
        Ok(())
    }
}
