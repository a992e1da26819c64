//! Positions and headings of the flock.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinematic state of one bird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// x coordinate in `[0, arena_size)`.
    pub x: f64,

    /// y coordinate in `[0, arena_size)`.
    pub y: f64,

    /// Heading in `[0, 2π)`, counterclockwise from the x-axis.
    pub heading: f64,
}

impl Bird {
    /// Constructs a bird.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }
}

/// State of the whole flock. Bird `0` is the pursuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Birds in agent order.
    pub birds: Vec<Bird>,
}

impl State {
    /// Constructs a state.
    pub fn new(birds: Vec<Bird>) -> Self {
        Self { birds }
    }

    /// Number of birds.
    pub fn len(&self) -> usize {
        self.birds.len()
    }

    /// `true` if there are no birds.
    pub fn is_empty(&self) -> bool {
        self.birds.is_empty()
    }

    /// The pursuer, if any.
    pub fn pursuer(&self) -> Option<&Bird> {
        self.birds.first()
    }
}

/// Formats positions as `x0,y0,x1,y1,...`.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.birds.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{},{}", b.x, b.y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let state = State::new(vec![Bird::new(0.5, 1.0, 0.0), Bird::new(2.0, 3.25, 1.0)]);
        assert_eq!(state.to_string(), "0.5,1,2,3.25");
        assert_eq!(State::new(vec![]).to_string(), "");
    }
}
