//! Off-policy n-step SARSA control
//!
//! Actions are chosen with an ε-greedy behaviour policy while the value
//! estimate targets the greedy policy, so every n-step update is weighted by
//! the importance-sampling ratio of the two along the updated segment.
//!
//! Time indexing: `S_t` and `A_t` are the state and action at step `t`, and
//! `R_{t+1}` is the reward for taking `A_t`. `start_attempt` writes `S_0` and
//! `A_0`; the `control` call made at step `t` writes `R_{t+1}`, `S_{t+1}` and
//! `A_{t+1}`, then updates the pair at `τ = t − n + 1` once that is
//! non-negative. `T`, the index of the terminal state, is fixed the first
//! time a goal reward arrives or the step budget runs out. From then on
//! `control` only drains the remaining updates until `τ = T − 1`.

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    Error, Result,
    ports::{Driver, Task},
    sarsa::{
        ActionDistribution, History, QTable, SarsaConfig, epsilon_greedy_policy, greedy_policy,
        sample_action,
    },
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Where the driver is in the episode lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// No episode running: before the first attempt or after the last update
    Idle,
    /// Acting in the environment and recording transitions
    InEpisode,
    /// Terminal step known; trailing updates still pending
    Finalizing,
}

/// Off-policy n-step SARSA driver over a tabular Q function
///
/// The Q-table lives for the whole run and is never reset between episodes.
#[derive(Debug, Clone)]
pub struct OffPolicyNStepSarsaDriver<T: Task> {
    config: SarsaConfig,
    task: T,
    q: QTable<T::State, T::Action>,
    history: History<T::State, T::Action>,
    current_step: usize,
    final_step: Option<usize>,
    finished: bool,
    started: bool,
    episodes: usize,
    rng: StdRng,
}

impl<T: Task> OffPolicyNStepSarsaDriver<T> {
    /// Create a driver with an empty Q-table
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any hyperparameter is out of
    /// range.
    pub fn new(config: SarsaConfig, task: T) -> Result<Self> {
        Self::with_q_table(config, task, QTable::new())
    }

    /// Create a driver that continues from an existing Q-table
    pub fn with_q_table(
        config: SarsaConfig,
        task: T,
        q: QTable<T::State, T::Action>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            history: History::new(config.step_no + 1),
            rng: build_rng(config.seed),
            config,
            task,
            q,
            current_step: 0,
            final_step: None,
            finished: false,
            started: false,
            episodes: 0,
        })
    }

    pub fn config(&self) -> &SarsaConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable<T::State, T::Action> {
        &self.q
    }

    /// Time index of the terminal state, once known
    pub fn final_step(&self) -> Option<usize> {
        self.final_step
    }

    /// Number of episodes started so far
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn phase(&self) -> EpisodePhase {
        match (self.started, self.finished, self.final_step) {
            (false, _, _) | (true, true, _) => EpisodePhase::Idle,
            (true, false, None) => EpisodePhase::InEpisode,
            (true, false, Some(_)) => EpisodePhase::Finalizing,
        }
    }

    /// Target policy for `state` under the current Q-table
    pub fn greedy_policy(&self, state: &T::State) -> Result<ActionDistribution<T::Action>> {
        let actions = self.task.available_actions(state);
        greedy_policy(&self.q, state, &actions)
    }

    /// Behaviour policy for `state` under the current Q-table
    pub fn behaviour_policy(&self, state: &T::State) -> Result<ActionDistribution<T::Action>> {
        let actions = self.task.available_actions(state);
        epsilon_greedy_policy(&self.q, self.config.experiment_rate, state, &actions)
    }

    fn behave(&mut self, state: &T::State) -> Result<T::Action> {
        let distribution = self.behaviour_policy(state)?;
        sample_action(&distribution, &mut self.rng)
    }

    fn before_terminal(&self) -> bool {
        self.final_step
            .is_none_or(|final_step| self.current_step < final_step)
    }

    /// Record `R_{t+1}`, `S_{t+1}` and choose `A_{t+1}` for the current step `t`
    fn record_step(&mut self, state: &T::State, last_reward: f64) -> Result<T::Action> {
        let next = self.current_step + 1;
        self.history.put_reward(next, last_reward);
        self.history.put_state(next, state.clone());

        if self.final_step.is_none() {
            let reached_goal = self.task.is_goal_reward(last_reward);
            let out_of_budget = self.current_step == self.config.max_learning_steps;
            if reached_goal || out_of_budget {
                self.final_step = Some(next);
                debug!(
                    episode = self.episodes,
                    final_step = next,
                    reached_goal,
                    "episode terminated"
                );
            }
        }

        // No action is ever taken from the terminal state.
        let action = if self.final_step.is_some() {
            self.task.neutral_action()
        } else {
            self.behave(state)?
        };
        self.history.put_action(next, action.clone());
        Ok(action)
    }

    /// Importance-sampling ratio `Π π(A_i|S_i) / b(A_i|S_i)` for `i` in
    /// `τ+1 ..= min(τ+n, T−1)`
    pub(crate) fn importance_weight(&self, update_step: usize) -> Result<f64> {
        let epsilon = self.config.experiment_rate;
        if epsilon == 0.0 {
            // Behaviour and target policy coincide.
            return Ok(1.0);
        }

        let mut upper = update_step + self.config.step_no;
        if let Some(final_step) = self.final_step {
            upper = upper.min(final_step.saturating_sub(1));
        }

        let mut weight = 1.0;
        for i in (update_step + 1)..=upper {
            let state = self.history.state(i)?;
            let action = self.history.action(i)?;
            let actions = self.task.available_actions(state);
            let target = greedy_policy(&self.q, state, &actions)?.probability(action);
            let behaviour =
                epsilon_greedy_policy(&self.q, epsilon, state, &actions)?.probability(action);
            if behaviour <= 0.0 {
                return Err(Error::InvalidDistribution {
                    message: format!(
                        "action {action:?} taken in {state:?} has zero behaviour probability"
                    ),
                });
            }
            weight *= target / behaviour;
        }
        Ok(weight)
    }

    /// Discounted rewards `Σ γ^(i−τ−1) R_i` for `i` in `τ+1 ..= min(τ+n, T)`
    pub(crate) fn return_value(&self, update_step: usize) -> Result<f64> {
        let mut upper = update_step + self.config.step_no;
        if let Some(final_step) = self.final_step {
            upper = upper.min(final_step);
        }

        let mut value = 0.0;
        let mut discount = 1.0;
        for i in (update_step + 1)..=upper {
            value += discount * self.history.reward(i)?;
            discount *= self.config.discount_factor;
        }
        Ok(value)
    }

    fn update(&mut self, update_step: usize) -> Result<()> {
        let n = self.config.step_no;
        let weight = self.importance_weight(update_step)?;
        let mut target = self.return_value(update_step)?;

        let horizon = update_step + n;
        if self.final_step.is_none_or(|final_step| horizon < final_step) {
            let state = self.history.state(horizon)?;
            let action = self.history.action(horizon)?;
            let bootstrap = self.config.discount_factor.powi(n as i32) * self.q.get(state, action);
            target += bootstrap;
        }

        let state = self.history.state(update_step)?.clone();
        let action = self.history.action(update_step)?.clone();
        self.q
            .update(state, action, target, self.config.step_size * weight);
        Ok(())
    }
}

impl<T: Task> Driver for OffPolicyNStepSarsaDriver<T> {
    type State = T::State;
    type Action = T::Action;

    fn start_attempt(&mut self, state: &T::State) -> Result<T::Action> {
        self.history.begin_episode();
        self.current_step = 0;
        self.final_step = None;
        self.finished = false;
        self.started = true;
        self.episodes += 1;

        self.history.put_state(0, state.clone());
        let action = self.behave(state)?;
        self.history.put_action(0, action.clone());
        Ok(action)
    }

    fn control(&mut self, state: &T::State, last_reward: f64) -> Result<T::Action> {
        if !self.started {
            return Err(Error::NoActiveEpisode);
        }
        if self.finished {
            self.current_step += 1;
            return Ok(self.task.neutral_action());
        }

        let action = if self.before_terminal() {
            self.record_step(state, last_reward)?
        } else {
            self.task.neutral_action()
        };

        if let Some(update_step) = (self.current_step + 1).checked_sub(self.config.step_no) {
            self.update(update_step)?;
            if self
                .final_step
                .is_some_and(|final_step| update_step + 1 == final_step)
            {
                self.finished = true;
                debug!(
                    episode = self.episodes,
                    steps = self.current_step + 1,
                    q_size = self.q.len(),
                    "episode finished learning"
                );
            }
        }

        self.current_step += 1;
        Ok(action)
    }

    fn finished_learning(&self) -> bool {
        self.finished
    }

    fn current_step(&self) -> usize {
        self.current_step
    }

    fn name(&self) -> &str {
        "Off-Policy n-step SARSA"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
    }
}
