//! Sector observers.
use crate::{geometry, PursuitEnvConfig, SectorObserverConfig, State};
use flock_core::{error::FlockError, BoxedObserver, Observation, Observer, StateIndexCodec};
use std::f64::consts::TAU;

/// Reading of a sector with no bird in sight.
pub const EMPTY: u32 = 0;

/// Reading of a sector with at least one evader and no pursuer.
pub const EVADER: u32 = 1;

/// Reading of a sector with the pursuer in it.
pub const PURSUER: u32 = 2;

/// Largest sector reading.
pub const MAX_READING: u32 = PURSUER;

/// Splits the circle around one bird into equal sectors and reports who is in each.
///
/// Sector `k` covers the angles `[k * 2π / n, (k + 1) * 2π / n)`, measured
/// counterclockwise from the bird's heading if the observer is directed and from
/// the arena x-axis otherwise. Neighbors are located through the periodic
/// boundary by their nearest image. Birds farther than the vision range are
/// not seen.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorObserver {
    agent: usize,
    n_sectors: usize,
    directed: bool,
    vision_range: Option<f64>,
    arena_size: f64,
}

impl SectorObserver {
    /// Directed observer of `agent` with unlimited vision.
    pub fn new(agent: usize, n_sectors: usize, arena_size: f64) -> Self {
        Self {
            agent,
            n_sectors,
            directed: true,
            vision_range: None,
            arena_size,
        }
    }

    /// Sets whether sectors follow the heading.
    pub fn directed(mut self, v: bool) -> Self {
        self.directed = v;
        self
    }

    /// Sets the vision range, unlimited if `None`.
    pub fn vision_range(mut self, v: Option<f64>) -> Self {
        self.vision_range = v;
        self
    }

    /// Observed bird.
    pub fn agent(&self) -> usize {
        self.agent
    }

    /// Sector containing a direction given in radians.
    fn sector_of(&self, angle: f64) -> usize {
        let width = TAU / self.n_sectors as f64;
        let k = (angle.rem_euclid(TAU) / width) as usize;
        k.min(self.n_sectors - 1)
    }
}

impl Observer<State> for SectorObserver {
    fn observe(&self, state: &State) -> Observation {
        let mut obs = Observation::new(self.n_sectors);
        let me = match state.birds.get(self.agent) {
            Some(b) if self.n_sectors > 0 => b,
            _ => return obs,
        };

        for (i, other) in state.birds.iter().enumerate() {
            if i == self.agent {
                continue;
            }
            let (dx, dy) = geometry::displacement(me, other, self.arena_size);
            if let Some(range) = self.vision_range {
                if dx.hypot(dy) > range {
                    continue;
                }
            }
            let mut angle = dy.atan2(dx);
            if self.directed {
                angle -= me.heading;
            }
            let sector = self.sector_of(angle);
            let reading = if i == 0 { PURSUER } else { EVADER };
            if obs.get(sector).unwrap_or(EMPTY) < reading {
                obs.set(sector, reading);
            }
        }

        obs
    }
}

/// Codec matching the observers built from `config`.
pub fn sector_codec(config: &SectorObserverConfig) -> Result<StateIndexCodec, FlockError> {
    StateIndexCodec::new(config.n_sectors, MAX_READING)
}

/// One observer per bird: the pursuer and the evaders get their own vision range.
pub fn sector_observers(
    env_config: &PursuitEnvConfig,
    config: &SectorObserverConfig,
) -> Vec<BoxedObserver<State>> {
    (0..env_config.n_birds)
        .map(|agent| -> BoxedObserver<State> {
            let range = if agent == 0 {
                config.pursuer_vision_range
            } else {
                config.evader_vision_range
            };
            Box::new(
                SectorObserver::new(agent, config.n_sectors, env_config.arena_size)
                    .directed(config.directed)
                    .vision_range(range),
            )
        })
        .collect()
}
