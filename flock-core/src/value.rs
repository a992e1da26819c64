//! Tabular state-value function.
use crate::{
    error::{ensure_finite, FlockError},
    StateIndex,
};

/// One state value per (agent, state index).
///
/// The table is zero-initialized, has a fixed size for the whole run, and is
/// mutated only by [`ValueTable::update`]. No clipping or normalization is
/// applied; a diverging table means the learning rate is mis-tuned.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    n_states: usize,
    values: Vec<Vec<f64>>,
}

impl ValueTable {
    /// Constructs a zero-initialized table for `n_agents` agents.
    pub fn new(n_agents: usize, n_states: usize) -> Self {
        Self {
            n_states,
            values: vec![vec![0.0; n_states]; n_agents],
        }
    }

    /// Number of agents.
    pub fn n_agents(&self) -> usize {
        self.values.len()
    }

    /// Number of states per agent.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Current estimate `V_agent(index)`.
    pub fn get(&self, agent: usize, index: StateIndex) -> Result<f64, FlockError> {
        let ix = self.check_index(index)?;
        Ok(self.row(agent)?[ix])
    }

    /// Temporal-difference update, `V_agent(index) += learning_rate * delta`.
    pub fn update(
        &mut self,
        agent: usize,
        index: StateIndex,
        delta: f64,
        learning_rate: f64,
    ) -> Result<(), FlockError> {
        ensure_finite("TD error", delta)?;
        ensure_finite("value learning rate", learning_rate)?;
        let ix = self.check_index(index)?;
        let n_agents = self.n_agents();
        let row = self
            .values
            .get_mut(agent)
            .ok_or(FlockError::AgentOutOfRange { agent, n_agents })?;
        row[ix] += learning_rate * delta;
        Ok(())
    }

    /// All values of an agent, in state index order.
    pub fn row(&self, agent: usize) -> Result<&[f64], FlockError> {
        self.values
            .get(agent)
            .map(Vec::as_slice)
            .ok_or(FlockError::AgentOutOfRange {
                agent,
                n_agents: self.n_agents(),
            })
    }

    fn check_index(&self, index: StateIndex) -> Result<usize, FlockError> {
        let ix = index.value();
        if ix < self.n_states {
            Ok(ix)
        } else {
            Err(FlockError::StateIndexOutOfRange {
                index: ix,
                n_states: self.n_states,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StateIndexCodec;

    fn codec() -> StateIndexCodec {
        StateIndexCodec::new(2, 1).unwrap()
    }

    #[test]
    fn test_zero_initialized() -> Result<(), FlockError> {
        let codec = codec();
        let table = ValueTable::new(3, codec.n_states());
        for agent in 0..3 {
            for ix in codec.indices() {
                assert_eq!(table.get(agent, ix)?, 0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn test_update_touches_one_entry() -> Result<(), FlockError> {
        let codec = codec();
        let mut table = ValueTable::new(2, codec.n_states());
        let ix = codec.index(2)?;
        table.update(1, ix, 2.0, 0.25)?;
        table.update(1, ix, 2.0, 0.25)?;

        assert_eq!(table.get(1, ix)?, 1.0);
        assert_eq!(table.row(0)?, &[0.0; 4]);
        assert_eq!(table.row(1)?, &[0.0, 0.0, 1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_zero_delta_is_noop() -> Result<(), FlockError> {
        let codec = codec();
        let mut table = ValueTable::new(1, codec.n_states());
        let ix = codec.index(1)?;
        table.update(0, ix, 0.5, 1.0)?;
        let before = table.clone();
        table.update(0, ix, 0.0, 0.1)?;
        assert_eq!(table, before);
        Ok(())
    }

    #[test]
    fn test_out_of_range() -> Result<(), FlockError> {
        let mut table = ValueTable::new(1, 4);
        let big = StateIndexCodec::new(3, 1)?.index(7)?;
        assert_eq!(
            table.get(0, big),
            Err(FlockError::StateIndexOutOfRange {
                index: 7,
                n_states: 4
            })
        );
        let ix = codec().index(0)?;
        assert_eq!(
            table.update(1, ix, 1.0, 1.0),
            Err(FlockError::AgentOutOfRange {
                agent: 1,
                n_agents: 1
            })
        );
        Ok(())
    }

    #[test]
    fn test_rejects_non_finite() -> Result<(), FlockError> {
        let mut table = ValueTable::new(1, 4);
        let ix = codec().index(0)?;
        assert!(matches!(
            table.update(0, ix, f64::NAN, 0.1),
            Err(FlockError::NonFinite { .. })
        ));
        assert!(matches!(
            table.update(0, ix, 1.0, f64::INFINITY),
            Err(FlockError::NonFinite { .. })
        ));
        assert_eq!(table.get(0, ix)?, 0.0);
        Ok(())
    }
}
