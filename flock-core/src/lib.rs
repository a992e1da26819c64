#![warn(missing_docs)]
//! Tabular actor-critic learning for pursuit-evasion flocks.
//!
//! A flock of birds interacts in an environment implementing [`Env`]. Bird `0`
//! is the pursuer and the others are evaders. Each bird perceives the world
//! through its own [`Observer`], whose discretized [`Observation`] is encoded
//! by a [`StateIndexCodec`] into a [`StateIndex`]. That index addresses the
//! bird's row of the [`ValueTable`] (critic) and of the [`BoltzmannPolicy`]
//! (actor). The [`Trainer`] runs episodes and updates both tables from the TD
//! error, with a [`TrainingSignal`] deciding which side of the chase learns.
pub mod error;
pub mod record;

mod base;
pub use base::{Action, Env, Observer, Step};

mod codec;
pub use codec::{Observation, StateIndex, StateIndexCodec};

mod value;
pub use value::ValueTable;

mod policy;
pub use policy::{softmax, BoltzmannPolicy, Row};

mod signal;
pub use signal::{ActiveLearner, TrainingSignal};

mod trainer;
pub use trainer::{BoxedObserver, Trainer, TrainerConfig, UpdateMode};

pub use error::FlockError;
