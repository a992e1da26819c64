//! Records emitted by the trainer.
use crate::{policy::Row, ActiveLearner, Action};
use serde::{Deserialize, Serialize};

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode number, starting from `0`.
    pub episode: usize,

    /// Number of environment steps taken, including the terminal one.
    pub steps: usize,

    /// Birds whose tables were updated in the episode.
    pub active_learner: ActiveLearner,

    /// `true` if the episode ended by termination rather than by reaching its length.
    pub terminated: bool,
}

/// Tables of one agent over the whole state space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTables {
    /// State values in state index order.
    pub values: Vec<f64>,

    /// Policy weights in state index order.
    pub weights: Vec<Row>,
}

/// Value and policy tables of every agent at an episode boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Episode after which the snapshot was taken.
    pub episode: usize,

    /// Tables, one entry per agent.
    pub agents: Vec<AgentTables>,
}

impl TableSnapshot {
    /// Number of states per agent.
    pub fn n_states(&self) -> usize {
        self.agents.first().map(|a| a.values.len()).unwrap_or(0)
    }

    /// Number of columns of a flattened row, `(1 + Action::COUNT) * n_agents`.
    pub fn width(&self) -> usize {
        (1 + Action::COUNT) * self.agents.len()
    }

    /// Flattened row of a state: for each agent, its value followed by its weights.
    ///
    /// Panics if `state` is out of range.
    pub fn row(&self, state: usize) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        for agent in self.agents.iter() {
            row.push(agent.values[state]);
            row.extend_from_slice(&agent.weights[state]);
        }
        row
    }
}
