//! Pursuit-evasion arena.
use crate::{geometry, Bird, PursuitEnvConfig, State};
use anyhow::Result;
use flock_core::{error::FlockError, Action, Env, Step};
use log::trace;
use std::f64::consts::TAU;

/// Birds flying at constant speed on a periodic square arena.
///
/// Each step every bird turns by its action, `+steering_angle` for
/// [`Action::Left`], nothing for [`Action::Straight`] and `-steering_angle`
/// for [`Action::Right`], and then moves `speed` along its new heading.
/// Positions wrap around the arena.
///
/// The episode terminates when an evader comes within `capture_range` of the
/// pursuer (bird `0`). Captured evaders receive `-1` and the pursuer `+1`.
/// While nobody is caught, the pursuer pays `1 / episode_length` per step and
/// every evader earns the same amount.
pub struct PursuitEnv {
    config: PursuitEnvConfig,
    rng: fastrand::Rng,
}

impl PursuitEnv {
    /// Configuration.
    pub fn config(&self) -> &PursuitEnvConfig {
        &self.config
    }

    fn turn(&self, action: Action) -> f64 {
        match action {
            Action::Left => self.config.steering_angle,
            Action::Straight => 0.0,
            Action::Right => -self.config.steering_angle,
        }
    }

    /// Indices of the evaders within capture range of the pursuer.
    pub fn captured(&self, state: &State) -> Vec<usize> {
        let pursuer = match state.pursuer() {
            Some(p) => p,
            None => return vec![],
        };
        let size = self.config.arena_size;
        state
            .birds
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, b)| {
                let (dx, dy) = geometry::displacement(pursuer, b, size);
                dx.hypot(dy) < self.config.capture_range
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn check_birds(&self, got: usize, what: &'static str) -> Result<(), FlockError> {
        if got == self.config.n_birds {
            Ok(())
        } else {
            Err(FlockError::AgentCountMismatch {
                what,
                expected: self.config.n_birds,
                got,
            })
        }
    }
}

impl Env for PursuitEnv {
    type Config = PursuitEnvConfig;
    type State = State;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.n_birds == 0 {
            return Err(FlockError::InvalidConfig("n_birds must be positive".to_string()).into());
        }
        if !(config.arena_size.is_finite() && config.arena_size > 0.0) {
            return Err(FlockError::InvalidConfig(format!(
                "arena_size must be positive, got {}",
                config.arena_size
            ))
            .into());
        }
        for (name, v) in [
            ("speed", config.speed),
            ("steering_angle", config.steering_angle),
            ("capture_range", config.capture_range),
        ] {
            if !v.is_finite() {
                return Err(FlockError::NonFinite { name, value: v }.into());
            }
        }

        Ok(Self {
            config: config.clone(),
            rng: fastrand::Rng::with_seed(seed as u64),
        })
    }

    fn n_agents(&self) -> usize {
        self.config.n_birds
    }

    fn reset(&mut self) -> Result<State> {
        let size = self.config.arena_size;
        let birds = (0..self.config.n_birds)
            .map(|_| {
                Bird::new(
                    self.rng.f64() * size,
                    self.rng.f64() * size,
                    self.rng.f64() * TAU,
                )
            })
            .collect();
        Ok(State::new(birds))
    }

    fn dynamics(&mut self, actions: &[Action], state: &State) -> Result<State> {
        self.check_birds(actions.len(), "actions")?;
        self.check_birds(state.len(), "birds in the state")?;

        let size = self.config.arena_size;
        let speed = self.config.speed;
        let birds = state
            .birds
            .iter()
            .zip(actions.iter())
            .map(|(b, a)| {
                let heading = (b.heading + self.turn(*a)).rem_euclid(TAU);
                Bird::new(
                    geometry::wrap(b.x + speed * heading.cos(), size),
                    geometry::wrap(b.y + speed * heading.sin(), size),
                    heading,
                )
            })
            .collect();
        Ok(State::new(birds))
    }

    fn reward(&mut self, state: &State, episode_length: usize) -> Result<Step> {
        self.check_birds(state.len(), "birds in the state")?;

        let n = self.config.n_birds;
        let captured = self.captured(state);
        if captured.is_empty() {
            let r = 1.0 / episode_length.max(1) as f64;
            let mut reward = vec![r; n];
            reward[0] = -r;
            Ok(Step::running(reward))
        } else {
            trace!("Captured evaders {:?}", captured);
            let mut reward = vec![0.0; n];
            reward[0] = 1.0;
            for i in captured {
                reward[i] = -1.0;
            }
            Ok(Step::terminal(reward))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    fn env(n_birds: usize) -> PursuitEnv {
        let config = PursuitEnvConfig::default().n_birds(n_birds).arena_size(10.0);
        PursuitEnv::build(&config, 42).unwrap()
    }

    #[test]
    fn test_reset_inside_arena() -> Result<()> {
        let mut env = env(20);
        let state = env.reset()?;
        assert_eq!(state.len(), 20);
        for b in state.birds.iter() {
            assert!((0.0..10.0).contains(&b.x));
            assert!((0.0..10.0).contains(&b.y));
            assert!((0.0..TAU).contains(&b.heading));
        }
        Ok(())
    }

    #[test]
    fn test_reset_is_seeded() -> Result<()> {
        let config = PursuitEnvConfig::default().n_birds(5);
        let s1 = PursuitEnv::build(&config, 3)?.reset()?;
        let s2 = PursuitEnv::build(&config, 3)?.reset()?;
        assert_eq!(s1, s2);
        Ok(())
    }

    #[test]
    fn test_dynamics_steers_and_wraps() -> Result<()> {
        let mut env = env(3);
        let state = State::new(vec![
            Bird::new(5.0, 5.0, 0.0),
            Bird::new(9.95, 5.0, 0.0),
            Bird::new(1.0, 1.0, 0.0),
        ]);
        let next = env.dynamics(&[Action::Left, Action::Straight, Action::Right], &state)?;

        let theta = PI / 6.0;
        assert!((next.birds[0].heading - theta).abs() < TOL);
        assert!((next.birds[0].x - (5.0 + 0.1 * theta.cos())).abs() < TOL);
        assert!((next.birds[0].y - (5.0 + 0.1 * theta.sin())).abs() < TOL);

        // Straight across the right edge.
        assert!((next.birds[1].x - 0.05).abs() < TOL);
        assert_eq!(next.birds[1].heading, 0.0);

        // Right turn from heading zero wraps to just below 2π.
        assert!((next.birds[2].heading - (TAU - theta)).abs() < TOL);
        Ok(())
    }

    #[test]
    fn test_dynamics_rejects_wrong_action_count() -> Result<()> {
        let mut env = env(3);
        let state = env.reset()?;
        assert!(env.dynamics(&[Action::Left], &state).is_err());
        Ok(())
    }

    #[test]
    fn test_capture_reward() -> Result<()> {
        let mut env = env(3);
        let state = State::new(vec![
            Bird::new(0.1, 0.1, 0.0),
            Bird::new(9.9, 0.1, 0.0),
            Bird::new(5.0, 5.0, 0.0),
        ]);
        let step = env.reward(&state, 500)?;
        assert!(step.is_terminated);
        assert_eq!(step.reward, vec![1.0, -1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_running_reward() -> Result<()> {
        let mut env = env(3);
        let state = State::new(vec![
            Bird::new(0.0, 0.0, 0.0),
            Bird::new(3.0, 0.0, 0.0),
            Bird::new(5.0, 5.0, 0.0),
        ]);
        let step = env.reward(&state, 4)?;
        assert!(!step.is_terminated);
        assert_eq!(step.reward, vec![-0.25, 0.25, 0.25]);
        Ok(())
    }
}
