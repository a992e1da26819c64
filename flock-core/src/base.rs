//! Core functionalities.
mod action;
mod env;
mod observer;
mod step;
pub use action::Action;
pub use env::Env;
pub use observer::Observer;
pub use step::Step;
