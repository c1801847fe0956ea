//! Environment port - what learners and runners may know about a control task

use std::{fmt::Debug, hash::Hash};

use crate::Result;

/// Outcome of applying one action to an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    /// State reached after the action
    pub state: S,
    /// Reward received for the action
    pub reward: f64,
    /// Whether the environment reached a terminal state
    pub done: bool,
}

impl<S> Transition<S> {
    pub fn new(state: S, reward: f64, done: bool) -> Self {
        Self {
            state,
            reward,
            done,
        }
    }
}

/// Static description of a task: legal actions and the goal convention.
///
/// Learners hold a `Task` rather than the environment itself, so they can
/// enumerate legal actions without being able to step the simulation.
pub trait Task {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Eq + Hash + Debug;

    /// Legal actions in `state`, in a stable order.
    ///
    /// Never empty for a non-terminal state.
    fn available_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Placeholder action returned once an episode is known to be over.
    fn neutral_action(&self) -> Self::Action;

    /// Whether `reward` signals that the goal was reached.
    ///
    /// Defaults to the zero-reward convention: every non-terminal step
    /// carries a nonzero (usually negative) reward. Environments where a
    /// zero reward can occur mid-episode must override this.
    fn is_goal_reward(&self, reward: f64) -> bool {
        reward == 0.0
    }
}

/// A simulated environment an experiment can reset and step.
pub trait Environment {
    type Task: Task + Clone;

    /// Task description shared with the learner.
    fn task(&self) -> Self::Task;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> <Self::Task as Task>::State;

    /// Apply `action` to the current state.
    fn step(
        &mut self,
        action: &<Self::Task as Task>::Action,
    ) -> Result<Transition<<Self::Task as Task>::State>>;
}
