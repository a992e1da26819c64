//! Environment.
use super::{Action, Step};
use anyhow::Result;

/// Represents the pursuit-evasion environment shared by all birds.
///
/// The environment owns no learning state. The trainer owns exactly one current
/// [`Env::State`] and replaces it with the value returned by [`Env::dynamics`]
/// at every step.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Full state of the world, positions and headings of every bird for example.
    type State: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Number of birds. Bird `0` is the pursuer, the others are evaders.
    fn n_agents(&self) -> usize;

    /// Returns the state at the start of an episode.
    fn reset(&mut self) -> Result<Self::State>;

    /// One-step dynamics: applies the joint action, one entry per bird, to `state`.
    fn dynamics(&mut self, actions: &[Action], state: &Self::State) -> Result<Self::State>;

    /// Rewards of all birds in `state` and whether the episode terminated there.
    ///
    /// `episode_length` is the maximum number of steps in an episode, which
    /// environments may use to scale per-step rewards.
    fn reward(&mut self, state: &Self::State, episode_length: usize) -> Result<Step>;
}
