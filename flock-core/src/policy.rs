//! Boltzmann (softmax) policy over the steering actions.
use crate::{
    error::{ensure_finite, FlockError},
    Action, StateIndex,
};
use rand::Rng;

/// Weights of one state, one per action in [`Action::ALL`] order.
pub type Row = [f64; Action::COUNT];

/// Softmax of a weight vector.
///
/// The maximum weight is subtracted before exponentiating, so the result is
/// finite for any finite input however large the weights grow during
/// training. The output is invariant under adding a constant to every weight.
pub fn softmax(theta: &[f64]) -> Vec<f64> {
    let max = theta.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = theta.iter().map(|t| (t - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Tabular Boltzmann policy of every agent.
///
/// `pi_agent(a | s) = exp(theta[agent][s][a]) / sum_b exp(theta[agent][s][b])`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoltzmannPolicy {
    n_states: usize,
    weights: Vec<Vec<Row>>,
}

impl BoltzmannPolicy {
    /// Constructs a policy with all weights zero, i.e. uniform action choice.
    pub fn new(n_agents: usize, n_states: usize) -> Self {
        Self {
            n_states,
            weights: vec![vec![[0.0; Action::COUNT]; n_states]; n_agents],
        }
    }

    /// Constructs a policy with weights drawn uniformly from `[-scale, scale)`.
    pub fn with_random_init(
        n_agents: usize,
        n_states: usize,
        scale: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let mut policy = Self::new(n_agents, n_states);
        if scale > 0.0 {
            for row in policy.weights.iter_mut().flatten() {
                for w in row.iter_mut() {
                    *w = rng.gen_range(-scale..scale);
                }
            }
        }
        policy
    }

    /// Number of agents.
    pub fn n_agents(&self) -> usize {
        self.weights.len()
    }

    /// Number of states per agent.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// All rows of an agent, in state index order.
    pub fn rows(&self, agent: usize) -> Result<&[Row], FlockError> {
        self.weights
            .get(agent)
            .map(Vec::as_slice)
            .ok_or(FlockError::AgentOutOfRange {
                agent,
                n_agents: self.n_agents(),
            })
    }

    /// Raw weights of a state.
    pub fn row(&self, agent: usize, index: StateIndex) -> Result<&Row, FlockError> {
        let ix = self.check_index(index)?;
        self.weights
            .get(agent)
            .map(|rows| &rows[ix])
            .ok_or(FlockError::AgentOutOfRange {
                agent,
                n_agents: self.n_agents(),
            })
    }

    /// Raw weight of an action, used for snapshots.
    pub fn get(&self, agent: usize, index: StateIndex, action: Action) -> Result<f64, FlockError> {
        Ok(self.row(agent, index)?[action.index()])
    }

    /// Action distribution at a state, in [`Action::ALL`] order.
    pub fn action_probabilities(
        &self,
        agent: usize,
        index: StateIndex,
    ) -> Result<Row, FlockError> {
        let probs = softmax(self.row(agent, index)?);
        let mut out = [0.0; Action::COUNT];
        out.copy_from_slice(&probs);
        Ok(out)
    }

    /// Samples an action.
    pub fn act(
        &self,
        agent: usize,
        index: StateIndex,
        rng: &mut impl Rng,
    ) -> Result<Action, FlockError> {
        let u: f64 = rng.gen();
        self.act_with_draw(agent, index, u)
    }

    /// Picks the first action with non-zero probability whose cumulative
    /// probability reaches `u`.
    ///
    /// `u` is expected in `[0, 1)`. An action whose probability underflowed to
    /// zero is never taken, even for `u == 0`. If rounding leaves the total
    /// slightly below `u`, the last action with non-zero probability is taken.
    pub fn act_with_draw(
        &self,
        agent: usize,
        index: StateIndex,
        u: f64,
    ) -> Result<Action, FlockError> {
        let probs = self.action_probabilities(agent, index)?;
        let mut cum = 0.0;
        let mut last = Action::ALL[Action::COUNT - 1];
        for (a, p) in Action::ALL.iter().zip(probs.iter()) {
            if *p <= 0.0 {
                continue;
            }
            cum += p;
            if cum >= u {
                return Ok(*a);
            }
            last = *a;
        }
        Ok(last)
    }

    /// Natural policy gradient step for a softmax policy.
    ///
    /// Every weight of the row moves by
    /// `step_size * td_error * (1[a == action] - p(a))`, with all `p(a)` taken
    /// from the row before the update. The changes sum to zero over the row.
    pub fn update(
        &mut self,
        agent: usize,
        index: StateIndex,
        step_size: f64,
        action: Action,
        td_error: f64,
    ) -> Result<(), FlockError> {
        ensure_finite("policy step size", step_size)?;
        ensure_finite("TD error", td_error)?;
        let probs = self.action_probabilities(agent, index)?;
        let ix = index.value();
        let row = &mut self.weights[agent][ix];
        let scale = step_size * td_error;
        for (a, (w, p)) in Action::ALL.iter().zip(row.iter_mut().zip(probs.iter())) {
            let indicator = if *a == action { 1.0 } else { 0.0 };
            *w += scale * (indicator - p);
        }
        Ok(())
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
