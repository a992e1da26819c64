//! Train birds with tabular actor-critic.
mod config;
use crate::{
    error::FlockError,
    record::{AgentTables, EpisodeSummary, Recorder, TableSnapshot},
    Action, ActiveLearner, BoltzmannPolicy, Env, Observer, StateIndex, StateIndexCodec, Step,
    TrainingSignal, ValueTable,
};
use anyhow::Result;
pub use config::{TrainerConfig, UpdateMode};
use log::{debug, info, trace};
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// Per-bird observer, boxed so birds can use different variants.
pub type BoxedObserver<S> = Box<dyn Observer<S>>;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs the on-policy actor-critic loop.
///
/// # Training loop
///
/// For every episode `ep` in `0..n_episodes`:
///
/// 1. Ask the [`TrainingSignal`] for the active learner of `ep`.
/// 2. Reset [`Env`] and compute the state index of every bird with its
///    [`Observer`] and the [`StateIndexCodec`].
/// 3. Until the episode terminates or `episode_length` steps are taken:
///     1. Every bird samples an [`Action`] from its [`BoltzmannPolicy`] row.
///     2. The joint action is applied with [`Env::dynamics`], giving the next state.
///     3. Every bird observes the next state.
///     4. [`Env::reward`] returns the rewards and the termination flag.
///     5. For each updated bird, the TD error is
///        * `r - V(s)` on a terminal step, without bootstrapping, or
///        * `r + gamma * V(s') - V(s)` otherwise,
///
///        and it drives both `V(s) += alpha_w * delta` and the natural-gradient
///        step of the policy row of `s` for the action taken.
///     6. On a non-terminal step, `s := s'`.
/// 4. Hand the [`EpisodeSummary`] to the [`Recorder`], and a [`TableSnapshot`]
///    every `snapshot_interval` episodes.
///
/// Which birds are updated depends on [`UpdateMode`]: only the active learners
/// with [`UpdateMode::Autocurriculum`], every bird with [`UpdateMode::AllAgents`].
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Env]-->|State|B[Observer]
///     B -->|Observation|C[StateIndexCodec]
///     C -->|StateIndex|D[BoltzmannPolicy]
///     D -->|Action|A
///     A -->|Step|E[ValueTable]
///     E -->|TD error|D
/// ```
///
/// Episodes run strictly one after another. Within a step, actions and
/// observations of different birds are independent; with
/// [`TrainerConfig::parallel`] they are computed on the rayon thread pool and
/// joined before the dynamics and before the update phase respectively.
pub struct Trainer<E: Env> {
    config: TrainerConfig,
    codec: StateIndexCodec,
    observers: Vec<BoxedObserver<E::State>>,
    signal: TrainingSignal,
    values: ValueTable,
    policy: BoltzmannPolicy,

    /// One sampling stream per bird, so that sampling is the same with or
    /// without parallelism.
    rngs: Vec<SmallRng>,
}

impl<E> Trainer<E>
where
    E: Env,
    E::State: Sync,
{
    /// Constructs a trainer for one bird per observer.
    pub fn build(
        config: TrainerConfig,
        codec: StateIndexCodec,
        observers: Vec<BoxedObserver<E::State>>,
    ) -> Result<Self> {
        config.validate()?;
        let n_agents = observers.len();
        if n_agents == 0 {
            return Err(FlockError::InvalidConfig("at least one bird is required".to_string()).into());
        }
        let n_states = codec.n_states();
        let signal = config.training_signal()?;
        let policy = {
            let mut rng = SmallRng::seed_from_u64(config.seed);
            BoltzmannPolicy::with_random_init(n_agents, n_states, config.init_weight_scale, &mut rng)
        };
        let rngs = (0..n_agents)
            .map(|agent| SmallRng::seed_from_u64(config.seed.wrapping_add(1 + agent as u64)))
            .collect();

        Ok(Self {
            values: ValueTable::new(n_agents, n_states),
            policy,
            rngs,
            signal,
            observers,
            codec,
            config,
        })
    }

    /// Configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Codec of observations.
    pub fn codec(&self) -> &StateIndexCodec {
        &self.codec
    }

    /// Number of birds.
    pub fn n_agents(&self) -> usize {
        self.observers.len()
    }

    /// Value tables.
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Policy weights.
    pub fn policy(&self) -> &BoltzmannPolicy {
        &self.policy
    }

    /// Autocurriculum schedule.
    pub fn signal(&self) -> &TrainingSignal {
        &self.signal
    }

    /// State index of every bird in `state`.
    fn observe(&self, state: &E::State) -> Result<Vec<StateIndex>, FlockError> {
        let codec = &self.codec;
        let encode = |observer: &BoxedObserver<E::State>| codec.encode(&observer.observe(state));
        if self.config.parallel {
            self.observers.par_iter().map(encode).collect()
        } else {
            self.observers.iter().map(encode).collect()
        }
    }

    /// Action of every bird at its current state index.
    fn act(&mut self, indices: &[StateIndex]) -> Result<Vec<Action>, FlockError> {
        let policy = &self.policy;
        if self.config.parallel {
            self.rngs
                .par_iter_mut()
                .zip(indices.par_iter())
                .enumerate()
                .map(|(agent, (rng, ix))| policy.act(agent, *ix, rng))
                .collect()
        } else {
            self.rngs
                .iter_mut()
                .zip(indices.iter())
                .enumerate()
                .map(|(agent, (rng, ix))| policy.act(agent, *ix, rng))
                .collect()
        }
    }

    /// Applies the TD update to the value and policy of the updated birds.
    ///
    /// `next` is `None` on a terminal step, in which case the TD target is
    /// the reward alone.
    fn learn(
        &mut self,
        learner: ActiveLearner,
        prev: &[StateIndex],
        next: Option<&[StateIndex]>,
        actions: &[Action],
        step: &Step,
    ) -> Result<(), FlockError> {
        let n_agents = self.n_agents();
        if step.reward.len() != n_agents {
            return Err(FlockError::AgentCountMismatch {
                what: "rewards",
                expected: n_agents,
                got: step.reward.len(),
            });
        }
        let gamma = self.config.discount_factor;

        for agent in 0..n_agents {
            if self.config.update_mode == UpdateMode::Autocurriculum && !learner.includes(agent) {
                continue;
            }
            let s = prev[agent];
            let target = match next {
                Some(next) => step.reward[agent] + gamma * self.values.get(agent, next[agent])?,
                None => step.reward[agent],
            };
            let delta = target - self.values.get(agent, s)?;
            self.values
                .update(agent, s, delta, self.config.value_learning_rate)?;
            self.policy.update(
                agent,
                s,
                self.config.policy_learning_rate,
                actions[agent],
                delta,
            )?;
        }

        Ok(())
    }

    /// Runs episode `episode` and returns its summary.
    ///
    /// Trajectory records are handed to `recorder` if the episode is a
    /// trajectory episode; the summary itself is not recorded here.
    pub fn run_episode<R>(
        &mut self,
        env: &mut E,
        episode: usize,
        recorder: &mut R,
    ) -> Result<EpisodeSummary>
    where
        R: Recorder<E::State> + ?Sized,
    {
        let timer = Instant::now();
        let learner = self.signal.active_learner(episode);
        let episode_length = self.config.episode_length;
        let record_trajectory =
            self.config.trajectory_interval > 0 && episode % self.config.trajectory_interval == 0;

        let mut state = env.reset()?;
        let mut prev = self.observe(&state)?;
        let mut steps = 0;
        let mut terminated = false;

        while steps < episode_length {
            if record_trajectory {
                recorder.record_trajectory(episode, &state)?;
            }

            let actions = self.act(&prev)?;
            let next_state = env.dynamics(&actions, &state)?;
            let next = self.observe(&next_state)?;
            let step = env.reward(&next_state, episode_length)?;
            steps += 1;
            trace!("Episode {}, step {}: rewards {:?}", episode, steps, step.reward);

            if step.is_terminated {
                self.learn(learner, &prev, None, &actions, &step)?;
                terminated = true;
                break;
            }

            self.learn(learner, &prev, Some(&next), &actions, &step)?;
            state = next_state;
            prev = next;
        }

        debug!(
            "Episode {} ({} learning): {} steps, terminated = {}, {:?}",
            episode,
            learner,
            steps,
            terminated,
            timer.elapsed()
        );

        Ok(EpisodeSummary {
            episode,
            steps,
            active_learner: learner,
            terminated,
        })
    }

    /// Copies the value and policy tables of every bird.
    pub fn snapshot(&self, episode: usize) -> Result<TableSnapshot, FlockError> {
        let agents = (0..self.n_agents())
            .map(|agent| {
                Ok(AgentTables {
                    values: self.values.row(agent)?.to_vec(),
                    weights: self.policy.rows(agent)?.to_vec(),
                })
            })
            .collect::<Result<Vec<_>, FlockError>>()?;
        Ok(TableSnapshot { episode, agents })
    }

    /// Train the birds.
    pub fn train<R>(&mut self, env: &mut E, recorder: &mut R) -> Result<()>
    where
        R: Recorder<E::State> + ?Sized,
    {
        if env.n_agents() != self.n_agents() {
            return Err(FlockError::AgentCountMismatch {
                what: "birds in the environment",
                expected: self.n_agents(),
                got: env.n_agents(),
            }
            .into());
        }

        let n_episodes = self.config.n_episodes;
        let snapshot_interval = self.config.snapshot_interval;
        info!(
            "Starts training: {} birds, {} states, {} episodes of at most {} steps",
            self.n_agents(),
            self.codec.n_states(),
            n_episodes,
            self.config.episode_length
        );

        let mut window_steps = 0;
        let mut window_episodes = 0;
        let mut window_captures = 0;

        for episode in 0..n_episodes {
            let summary = self.run_episode(env, episode, recorder)?;
            recorder.record_episode(&summary)?;

            window_steps += summary.steps;
            window_episodes += 1;
            window_captures += summary.terminated as usize;

            if snapshot_interval > 0 && episode % snapshot_interval == 0 {
                recorder.record_snapshot(&self.snapshot(episode)?)?;
                info!(
                    "Episode {}: {} learning, mean length {:.1}, terminated {}/{}",
                    episode,
                    summary.active_learner,
                    window_steps as f64 / window_episodes as f64,
                    window_captures,
                    window_episodes
                );
                window_steps = 0;
                window_episodes = 0;
                window_captures = 0;
            }
        }

        recorder.flush()?;
        info!("Finished training after {} episodes", n_episodes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Observation;

    struct Idle;

    impl Env for Idle {
        type Config = ();
        type State = ();

        fn build(_config: &(), _seed: i64) -> Result<Self> {
            Ok(Self)
        }

        fn n_agents(&self) -> usize {
            1
        }

        fn reset(&mut self) -> Result<()> {
            Ok(())
        }

        fn dynamics(&mut self, _actions: &[Action], _state: &()) -> Result<()> {
            Ok(())
        }

        fn reward(&mut self, _state: &(), _episode_length: usize) -> Result<Step> {
            Ok(Step::running(vec![0.0]))
        }
    }

    fn trainer(config: TrainerConfig) -> Trainer<Idle> {
        let codec = StateIndexCodec::new(2, 1).unwrap();
        let observers: Vec<BoxedObserver<()>> =
            vec![Box::new(|_: &()| Observation::from(vec![0, 0]))];
        Trainer::build(config, codec, observers).unwrap()
    }

    fn ix(raw: usize) -> StateIndex {
        StateIndexCodec::new(2, 1).unwrap().index(raw).unwrap()
    }

    #[test]
    fn test_terminal_target_ignores_next_value() -> Result<()> {
        let config = TrainerConfig::default().value_learning_rate(1.0);
        let mut t = trainer(config);
        // V(3) = 5
        t.values.update(0, ix(3), 5.0, 1.0)?;

        t.learn(
            ActiveLearner::Pursuer,
            &[ix(0)],
            None,
            &[Action::Left],
            &Step::terminal(vec![1.0]),
        )?;
        assert_eq!(t.values.get(0, ix(0))?, 1.0);

        t.learn(
            ActiveLearner::Pursuer,
            &[ix(1)],
            Some(&[ix(3)]),
            &[Action::Left],
            &Step::running(vec![1.0]),
        )?;
        assert_eq!(t.values.get(0, ix(1))?, 6.0);
        Ok(())
    }

    #[test]
    fn test_discount_factor() -> Result<()> {
        let config = TrainerConfig::default()
            .value_learning_rate(0.5)
            .discount_factor(0.5);
        let mut t = trainer(config);
        t.values.update(0, ix(2), 4.0, 1.0)?;
        t.learn(
            ActiveLearner::Pursuer,
            &[ix(0)],
            Some(&[ix(2)]),
            &[Action::Straight],
            &Step::running(vec![0.0]),
        )?;
        // delta = 0 + 0.5 * 4 - 0
        assert_eq!(t.values.get(0, ix(0))?, 1.0);
        assert!(t.policy.get(0, ix(0), Action::Straight)? > 0.0);
        Ok(())
    }

    #[test]
    fn test_zero_td_error_leaves_tables() -> Result<()> {
        let mut t = trainer(TrainerConfig::default());
        t.values.update(0, ix(1), 2.0, 1.0)?;
        t.values.update(0, ix(2), 2.0, 1.0)?;
        let policy = t.policy.clone();
        t.learn(
            ActiveLearner::Pursuer,
            &[ix(1)],
            Some(&[ix(2)]),
            &[Action::Right],
            &Step::running(vec![0.0]),
        )?;
        assert_eq!(t.values.get(0, ix(1))?, 2.0);
        assert_eq!(t.policy, policy);
        Ok(())
    }

    #[test]
    fn test_inactive_learner_is_skipped() -> Result<()> {
        let mut t = trainer(TrainerConfig::default());
        t.learn(
            ActiveLearner::Evaders,
            &[ix(0)],
            None,
            &[Action::Left],
            &Step::terminal(vec![1.0]),
        )?;
        assert_eq!(t.values.get(0, ix(0))?, 0.0);

        let mut t = trainer(TrainerConfig::default().update_mode(UpdateMode::AllAgents));
        t.learn(
            ActiveLearner::Evaders,
            &[ix(0)],
            None,
            &[Action::Left],
            &Step::terminal(vec![1.0]),
        )?;
        assert!(t.values.get(0, ix(0))? > 0.0);
        Ok(())
    }

    #[test]
    fn test_reward_count_mismatch() {
        let mut t = trainer(TrainerConfig::default());
        let result = t.learn(
            ActiveLearner::Pursuer,
            &[ix(0)],
            None,
            &[Action::Left],
            &Step::terminal(vec![1.0, 2.0]),
        );
        assert!(matches!(
            result,
            Err(FlockError::AgentCountMismatch { .. })
        ));
    }

    #[test]
    fn test_episode_runs_to_length() -> Result<()> {
        let mut t = trainer(TrainerConfig::default().episode_length(7));
        let summary = t.run_episode(&mut Idle, 3, &mut crate::record::NullRecorder::new())?;
        assert_eq!(summary.steps, 7);
        assert!(!summary.terminated);
        assert_eq!(summary.episode, 3);
        Ok(())
    }
}
