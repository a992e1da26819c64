//! Environment step.

/// Rewards of all birds at one step, with the termination flag.
///
/// An environment emits a [`Step`] once per interaction step. It is consumed
/// by the update phase of the same step and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Reward of each bird.
    pub reward: Vec<f64>,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(reward: Vec<f64>, is_terminated: bool) -> Self {
        Self {
            reward,
            is_terminated,
        }
    }

    /// A non-terminal step.
    pub fn running(reward: Vec<f64>) -> Self {
        Self::new(reward, false)
    }

    /// A terminal step.
    pub fn terminal(reward: Vec<f64>) -> Self {
        Self::new(reward, true)
    }
}
