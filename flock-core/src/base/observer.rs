//! Observer.
use crate::Observation;

/// Perception of one bird.
///
/// An observer is attached to a single bird at construction and turns the full
/// state into that bird's discretized [`Observation`]. Birds may use different
/// observer variants (directed or undirected sectors, different vision ranges).
///
/// Observers are shared between worker threads when the trainer fans out
/// observation across birds, hence the `Send + Sync` bound.
pub trait Observer<S>: Send + Sync {
    /// Observes `state` from the point of view of the attached bird.
    ///
    /// The returned observation must have the length and value bound of the
    /// codec used by the trainer; the codec rejects it otherwise.
    fn observe(&self, state: &S) -> Observation;
}

impl<S, F> Observer<S> for F
where
    F: Fn(&S) -> Observation + Send + Sync,
{
    fn observe(&self, state: &S) -> Observation {
        self(state)
    }
}
