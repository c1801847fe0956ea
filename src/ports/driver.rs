//! Driver port - the contract between an experiment runner and a learner
//!
//! An experiment calls [`Driver::start_attempt`] once per episode and
//! [`Driver::control`] once for every following environment step, polling
//! [`Driver::finished_learning`] after each call. Any learner honouring this
//! cadence can be swapped in, e.g. the off-policy n-step SARSA driver or the
//! random baseline.

use crate::Result;

/// Unified interface for every learner the experiment runner can drive.
pub trait Driver {
    /// Opaque environment state.
    type State;
    /// Opaque action chosen from a state-dependent legal set.
    type Action;

    /// Begin a new episode in `state` and return the first action.
    ///
    /// # Errors
    ///
    /// Returns an error if the state has no legal actions.
    fn start_attempt(&mut self, state: &Self::State) -> Result<Self::Action>;

    /// React to one environment step.
    ///
    /// `state` is the state reached by the previous action and `last_reward`
    /// the reward received for it. The returned action is what the learner
    /// wants to do next; once the episode is known to be over it is the
    /// task's neutral action.
    fn control(&mut self, state: &Self::State, last_reward: f64) -> Result<Self::Action>;

    /// Whether the current episode needs no further `control` calls.
    fn finished_learning(&self) -> bool;

    /// Number of `control` calls made in the current episode.
    fn current_step(&self) -> usize;

    /// Get the driver's name.
    ///
    /// Used for identification in summaries and logging.
    fn name(&self) -> &str;

    /// Seed the driver's internal random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for deterministic drivers.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
