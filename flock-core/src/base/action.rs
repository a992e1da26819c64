//! Action.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steering action of a bird.
///
/// The set is fixed for the whole library. Its position in [`Action::ALL`] is the
/// column of the action in a policy row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Turn left.
    Left,

    /// Keep the heading.
    Straight,

    /// Turn right.
    Right,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 3;

    /// All actions in column order.
    pub const ALL: [Action; Action::COUNT] = [Action::Left, Action::Straight, Action::Right];

    /// Column of the action in a policy row.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Straight => 1,
            Action::Right => 2,
        }
    }

    /// Lower-case name, used for column headers of snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Straight => "straight",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_column_order() {
        for (ix, a) in Action::ALL.iter().enumerate() {
            assert_eq!(a.index(), ix);
        }
    }
}
