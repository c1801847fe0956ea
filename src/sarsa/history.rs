//! Sliding window of per-step (state, action, reward) records
//!
//! An n-step update never looks further back than n+1 steps, so the history
//! is a ring of exactly n+1 slots addressed by `step mod (n+1)`. Older
//! records are overwritten in place and never cleared.
//!
//! Every slot remembers which episode and step wrote it. A read whose tag
//! does not match returns [`Error::HistoryEvicted`] instead of silently
//! handing back a newer record.

use crate::{Error, Result};

#[derive(Debug, Clone)]
struct Slot<T> {
    episode: u64,
    step: usize,
    value: T,
}

#[derive(Debug, Clone)]
struct Ring<T> {
    slots: Vec<Option<Slot<T>>>,
}

impl<T> Ring<T> {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    fn put(&mut self, episode: u64, step: usize, value: T) {
        let index = step % self.slots.len();
        self.slots[index] = Some(Slot {
            episode,
            step,
            value,
        });
    }

    fn get(&self, episode: u64, step: usize) -> Result<&T> {
        let window = self.slots.len();
        match &self.slots[step % window] {
            Some(slot) if slot.episode == episode && slot.step == step => Ok(&slot.value),
            _ => Err(Error::HistoryEvicted { step, window }),
        }
    }
}

/// Fixed-capacity history of one episode's recent steps
#[derive(Debug, Clone)]
pub struct History<S, A> {
    states: Ring<S>,
    actions: Ring<A>,
    rewards: Ring<f64>,
    episode: u64,
}

impl<S, A> History<S, A> {
    /// Create a history holding `window` consecutive steps (n+1 for n-step returns)
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            states: Ring::new(window),
            actions: Ring::new(window),
            rewards: Ring::new(window),
            episode: 0,
        }
    }

    /// Start tagging writes with a fresh episode
    ///
    /// Records from earlier episodes stay in place but no longer satisfy reads.
    pub fn begin_episode(&mut self) {
        self.episode += 1;
    }

    pub fn put_state(&mut self, step: usize, state: S) {
        self.states.put(self.episode, step, state);
    }

    pub fn put_action(&mut self, step: usize, action: A) {
        self.actions.put(self.episode, step, action);
    }

    pub fn put_reward(&mut self, step: usize, reward: f64) {
        self.rewards.put(self.episode, step, reward);
    }

    pub fn state(&self, step: usize) -> Result<&S> {
        self.states.get(self.episode, step)
    }

    pub fn action(&self, step: usize) -> Result<&A> {
        self.actions.get(self.episode, step)
    }

    pub fn reward(&self, step: usize) -> Result<f64> {
        self.rewards.get(self.episode, step).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_within_window() {
        let mut history: History<&str, char> = History::new(3);
        history.begin_episode();
        history.put_state(7, "A");
        history.put_action(7, 'R');
        history.put_reward(7, -1.0);

        assert_eq!(*history.state(7).unwrap(), "A");
        assert_eq!(*history.action(7).unwrap(), 'R');
        assert_eq!(history.reward(7).unwrap(), -1.0);
    }

    #[test]
    fn test_slots_wrap_modulo_window() {
        let mut history: History<usize, ()> = History::new(3);
        history.begin_episode();
        for step in 0..5 {
            history.put_state(step, step * 10);
        }
        assert_eq!(*history.state(4).unwrap(), 40);
        assert_eq!(*history.state(3).unwrap(), 30);
        assert_eq!(*history.state(2).unwrap(), 20);
    }

    #[test]
    fn test_overwritten_step_is_reported() {
        let mut history: History<usize, ()> = History::new(2);
        history.begin_episode();
        history.put_state(0, 0);
        history.put_state(1, 1);
        history.put_state(2, 2);

        match history.state(0) {
            Err(Error::HistoryEvicted { step, window }) => {
                assert_eq!(step, 0);
                assert_eq!(window, 2);
            }
            other => panic!("expected eviction, got {other:?}"),
        }
    }

    #[test]
    fn test_previous_episode_records_are_not_readable() {
        let mut history: History<usize, ()> = History::new(4);
        history.begin_episode();
        history.put_state(1, 11);
        history.begin_episode();
        assert!(history.state(1).is_err());
        history.put_state(1, 21);
        assert_eq!(*history.state(1).unwrap(), 21);
    }

    #[test]
    fn test_unwritten_reward_is_an_error() {
        let mut history: History<(), ()> = History::new(2);
        history.begin_episode();
        assert!(history.reward(0).is_err());
    }
}
