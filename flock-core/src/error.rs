//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Every variant is a violated precondition of the tabular mapping or of the
/// numerical update rules. None of them is recoverable within a step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlockError {
    /// An observation does not have the number of sectors the codec was built with.
    #[error("Observation has {got} sectors, expected {expected}")]
    ObservationLength {
        /// Expected number of sectors.
        expected: usize,
        /// Actual number of sectors.
        got: usize,
    },

    /// A sector reading exceeds the declared maximum value.
    #[error("Sector {sector} has value {value}, maximum is {max_value}")]
    SectorValueOutOfRange {
        /// Sector position in the observation.
        sector: usize,
        /// The offending reading.
        value: u32,
        /// Declared maximum reading.
        max_value: u32,
    },

    /// A state index does not address a row of the table.
    #[error("State index {index} out of range, state space has {n_states} states")]
    StateIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Cardinality of the state space.
        n_states: usize,
    },

    /// An agent id does not address a table.
    #[error("Agent {agent} out of range, there are {n_agents} agents")]
    AgentOutOfRange {
        /// The offending agent id.
        agent: usize,
        /// Number of agents.
        n_agents: usize,
    },

    /// `(max_value + 1)^n_sectors` does not fit into `usize`.
    #[error("State space of {n_sectors} sectors with radix {radix} is too large")]
    StateSpaceTooLarge {
        /// Number of sectors.
        n_sectors: usize,
        /// Radix of the encoding.
        radix: usize,
    },

    /// A non-finite value reached an update.
    #[error("Non-finite {name}: {value}")]
    NonFinite {
        /// Name of the quantity.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The number of per-agent items handed back by a collaborator is wrong.
    #[error("Expected {expected} {what}, got {got}")]
    AgentCountMismatch {
        /// What was counted.
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Actual count.
        got: usize,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Returns [`FlockError::NonFinite`] if `value` is NaN or infinite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<(), FlockError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FlockError::NonFinite { name, value })
    }
}
