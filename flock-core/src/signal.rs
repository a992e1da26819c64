//! Autocurriculum schedule.
use crate::error::FlockError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which birds update their policy in an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveLearner {
    /// Only the pursuer, bird `0`.
    Pursuer,

    /// Every bird except the pursuer.
    Evaders,
}

impl ActiveLearner {
    /// Returns `true` if `agent` belongs to the selected set.
    #[inline]
    pub fn includes(self, agent: usize) -> bool {
        match self {
            ActiveLearner::Pursuer => agent == 0,
            ActiveLearner::Evaders => agent != 0,
        }
    }

    /// Numeric id written to episode summaries, `0` for the pursuer and `1` for evaders.
    pub fn id(self) -> usize {
        match self {
            ActiveLearner::Pursuer => 0,
            ActiveLearner::Evaders => 1,
        }
    }
}

impl fmt::Display for ActiveLearner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveLearner::Pursuer => f.write_str("pursuer"),
            ActiveLearner::Evaders => f.write_str("evaders"),
        }
    }
}

/// Episode-keyed schedule of the active learner.
///
/// Before the first threshold the pursuer learns. Crossing a threshold hands
/// learning to the evaders, or, with `alternate`, to the other side of the
/// previous phase. Once every threshold has been crossed `after` is returned.
///
/// The signal is a pure function of the episode number, so episodes may be
/// queried in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSignal {
    thresholds: Vec<usize>,
    alternate: bool,
    after: ActiveLearner,
}

impl TrainingSignal {
    /// Constructs a signal. `thresholds` must be strictly ascending.
    pub fn new(thresholds: Vec<usize>) -> Result<Self, FlockError> {
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FlockError::InvalidConfig(format!(
                "learner thresholds must be strictly ascending: {:?}",
                thresholds
            )));
        }
        Ok(Self {
            thresholds,
            alternate: false,
            after: ActiveLearner::Evaders,
        })
    }

    /// Alternates between pursuer and evaders at every threshold.
    pub fn alternate(mut self, v: bool) -> Self {
        self.alternate = v;
        self
    }

    /// Learner once the thresholds are exhausted. Defaults to the evaders.
    pub fn after(mut self, v: ActiveLearner) -> Self {
        self.after = v;
        self
    }

    /// Episode thresholds.
    pub fn thresholds(&self) -> &[usize] {
        &self.thresholds
    }

    /// Active learner in `episode`.
    pub fn active_learner(&self, episode: usize) -> ActiveLearner {
        let crossed = self.thresholds.partition_point(|&t| t <= episode);
        if crossed == self.thresholds.len() {
            self.after
        } else if crossed == 0 {
            ActiveLearner::Pursuer
        } else if self.alternate && crossed % 2 == 0 {
            ActiveLearner::Pursuer
        } else {
            ActiveLearner::Evaders
        }
    }
}
