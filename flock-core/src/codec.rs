//! Mixed-radix codec between observations and table indices.
//!
//! An observation of `n` sectors with readings in `0..=M` is encoded as
//!
//! ```text
//! index = o[0] + o[1] * (M+1) + ... + o[n-1] * (M+1)^(n-1)
//! ```
//!
//! which is a bijection onto `0..(M+1)^n`. The index is the only key of the
//! value table and the policy.
use crate::error::FlockError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discretized perception of a single bird, one reading per sector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Observation(Vec<u32>);

impl Observation {
    /// An observation of `n_sectors` empty sectors.
    pub fn new(n_sectors: usize) -> Self {
        Self(vec![0; n_sectors])
    }

    /// Sets the reading of a sector. Panics if `sector` is out of range.
    pub fn set(&mut self, sector: usize, value: u32) {
        self.0[sector] = value;
    }

    /// Reading of a sector.
    pub fn get(&self, sector: usize) -> Option<u32> {
        self.0.get(sector).copied()
    }

    /// Number of sectors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the observation has no sectors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Readings as a slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for Observation {
    fn from(v: Vec<u32>) -> Self {
        Self(v)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.0.iter() {
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

/// Row key of the tabular value function and policy.
///
/// Only [`StateIndexCodec`] hands out indices, so an index is always within the
/// state space of the codec that produced it. Tables still check the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateIndex(usize);

impl StateIndex {
    /// Raw integer value.
    #[inline]
    pub fn value(self) -> usize {
        self.0
    }
}

impl From<StateIndex> for usize {
    fn from(ix: StateIndex) -> Self {
        ix.0
    }
}

impl fmt::Display for StateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bidirectional mapping between [`Observation`] and [`StateIndex`].
///
/// # Preconditions
///
/// Every reading passed to [`StateIndexCodec::encode`] must be at most
/// `max_value` and the observation must have exactly `n_sectors` readings.
/// Violations are reported as errors rather than wrapped into another
/// index, which would silently alias two table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateIndexCodec {
    n_sectors: usize,
    max_value: u32,
    n_states: usize,
}

impl StateIndexCodec {
    /// Constructs a codec for observations of `n_sectors` readings in `0..=max_value`.
    pub fn new(n_sectors: usize, max_value: u32) -> Result<Self, FlockError> {
        if n_sectors == 0 {
            return Err(FlockError::InvalidConfig(
                "observations need at least one sector".to_string(),
            ));
        }
        let radix = max_value as usize + 1;
        let n_states = u32::try_from(n_sectors)
            .ok()
            .and_then(|n| radix.checked_pow(n))
            .ok_or(FlockError::StateSpaceTooLarge { n_sectors, radix })?;

        Ok(Self {
            n_sectors,
            max_value,
            n_states,
        })
    }

    /// Number of sectors.
    pub fn n_sectors(&self) -> usize {
        self.n_sectors
    }

    /// Maximum reading of a sector.
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Base of the positional encoding, `max_value + 1`.
    pub fn radix(&self) -> usize {
        self.max_value as usize + 1
    }

    /// Cardinality of the state space, `radix^n_sectors`.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Checked conversion of a raw integer into a [`StateIndex`].
    pub fn index(&self, raw: usize) -> Result<StateIndex, FlockError> {
        if raw < self.n_states {
            Ok(StateIndex(raw))
        } else {
            Err(FlockError::StateIndexOutOfRange {
                index: raw,
                n_states: self.n_states,
            })
        }
    }

    /// Iterates over the whole state space in increasing order.
    pub fn indices(&self) -> impl Iterator<Item = StateIndex> {
        (0..self.n_states).map(StateIndex)
    }

    /// Encodes an observation.
    pub fn encode(&self, obs: &Observation) -> Result<StateIndex, FlockError> {
        if obs.len() != self.n_sectors {
            return Err(FlockError::ObservationLength {
                expected: self.n_sectors,
                got: obs.len(),
            });
        }

        let radix = self.radix();
        let mut index = 0usize;
        let mut weight = 1usize;
        for (sector, &value) in obs.as_slice().iter().enumerate() {
            if value > self.max_value {
                return Err(FlockError::SectorValueOutOfRange {
                    sector,
                    value,
                    max_value: self.max_value,
                });
            }
            index += value as usize * weight;
            // The last multiplication may exceed n_states, which is never used.
            weight = weight.saturating_mul(radix);
        }

        Ok(StateIndex(index))
    }

    /// Decodes an index back into the observation it was encoded from.
    pub fn decode(&self, index: StateIndex) -> Result<Observation, FlockError> {
        let mut rest = self.index(index.0)?.0;
        let radix = self.radix();
        let mut obs = Observation::new(self.n_sectors);
        for sector in 0..self.n_sectors {
            obs.set(sector, (rest % radix) as u32);
            rest /= radix;
        }
        Ok(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_space_size() -> Result<(), FlockError> {
        assert_eq!(StateIndexCodec::new(5, 2)?.n_states(), 243);
        assert_eq!(StateIndexCodec::new(2, 1)?.n_states(), 4);
        assert_eq!(StateIndexCodec::new(3, 0)?.n_states(), 1);
        Ok(())
    }

    #[test]
    fn test_encode_is_little_endian() -> Result<(), FlockError> {
        let codec = StateIndexCodec::new(3, 2)?;
        assert_eq!(codec.encode(&vec![1, 0, 0].into())?.value(), 1);
        assert_eq!(codec.encode(&vec![0, 1, 0].into())?.value(), 3);
        assert_eq!(codec.encode(&vec![2, 1, 2].into())?.value(), 2 + 3 + 18);
        Ok(())
    }

    #[test]
    fn test_bijection() -> Result<(), FlockError> {
        let codec = StateIndexCodec::new(4, 2)?;
        for ix in codec.indices() {
            let obs = codec.decode(ix)?;
            assert_eq!(codec.encode(&obs)?, ix);
        }

        // All observations of two binary sectors.
        let codec = StateIndexCodec::new(2, 1)?;
        for a in 0..=1 {
            for b in 0..=1 {
                let obs = Observation::from(vec![a, b]);
                assert_eq!(codec.decode(codec.encode(&obs)?)?, obs);
            }
        }
        Ok(())
    }

    #[test]
    fn test_rejects_out_of_range_reading() -> Result<(), FlockError> {
        let codec = StateIndexCodec::new(2, 1)?;
        assert_eq!(
            codec.encode(&vec![0, 2].into()),
            Err(FlockError::SectorValueOutOfRange {
                sector: 1,
                value: 2,
                max_value: 1
            })
        );
        Ok(())
    }

    #[test]
    fn test_rejects_wrong_length() -> Result<(), FlockError> {
        let codec = StateIndexCodec::new(2, 1)?;
        assert_eq!(
            codec.encode(&vec![0, 1, 0].into()),
            Err(FlockError::ObservationLength {
                expected: 2,
                got: 3
            })
        );
        Ok(())
    }

    #[test]
    fn test_rejects_out_of_range_index() -> Result<(), FlockError> {
        let codec = StateIndexCodec::new(2, 1)?;
        assert!(codec.index(3).is_ok());
        assert_eq!(
            codec.index(4),
            Err(FlockError::StateIndexOutOfRange {
                index: 4,
                n_states: 4
            })
        );
        Ok(())
    }

    #[test]
    fn test_rejects_huge_state_space() {
        assert!(matches!(
            StateIndexCodec::new(200, 9),
            Err(FlockError::StateSpaceTooLarge { .. })
        ));
        assert!(StateIndexCodec::new(0, 1).is_err());
    }

    #[test]
    fn test_display_observation() {
        let obs = Observation::from(vec![0, 1, 2, 0, 1]);
        assert_eq!(obs.to_string(), "01201");
    }
}
