//! Action-value table for tabular temporal difference learning

use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Serialize};

/// Value reported for (state, action) pairs that were never updated.
pub const DEFAULT_Q_VALUE: f64 = 0.0;

/// Q-table mapping (state, action) pairs to value estimates
///
/// Lookups never insert: a miss reads as [`DEFAULT_Q_VALUE`]. Entries are
/// only created by [`QTable::set`] and [`QTable::update`], so the table's
/// size is the number of distinct pairs the learner actually updated. The
/// table grows for the whole run and is never evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, A: Serialize",
    deserialize = "S: Deserialize<'de> + Eq + Hash, A: Deserialize<'de> + Eq + Hash"
))]
pub struct QTable<S, A> {
    values: HashMap<S, HashMap<A, f64>>,
}

impl<S, A> QTable<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &S, action: &A) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(DEFAULT_Q_VALUE)
    }

    /// Whether the pair has ever been written
    pub fn contains(&self, state: &S, action: &A) -> bool {
        self.values
            .get(state)
            .is_some_and(|row| row.contains_key(action))
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Move `Q(s,a)` toward `target` by `scale` of the error
    ///
    /// Q(s,a) ← Q(s,a) + scale · (target − Q(s,a))
    ///
    /// Returns the new value.
    pub fn update(&mut self, state: S, action: A, target: f64, scale: f64) -> f64 {
        let slot = self
            .values
            .entry(state)
            .or_default()
            .entry(action)
            .or_insert(DEFAULT_Q_VALUE);
        *slot += scale * (target - *slot);
        *slot
    }

    /// Q-values of `actions` in `state`, in the same order
    pub fn values_for(&self, state: &S, actions: &[A]) -> Vec<f64> {
        actions
            .iter()
            .map(|action| self.get(state, action))
            .collect()
    }

    /// Get total number of Q-values stored
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct states with at least one stored value
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Iterate over every stored `(state, action, value)`
    pub fn iter(&self) -> impl Iterator<Item = (&S, &A, f64)> {
        self.values
            .iter()
            .flat_map(|(state, row)| row.iter().map(move |(action, &value)| (state, action, value)))
    }
}

impl<S, A> Default for QTable<S, A>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_defaults_to_zero() {
        let qtable: QTable<u8, char> = QTable::new();
        assert_eq!(qtable.get(&0, &'L'), 0.0);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        qtable.set(3u8, 'R', 1.5);
        assert_eq!(qtable.get(&3, &'R'), 1.5);
        assert_eq!(qtable.get(&3, &'L'), 0.0);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_reads_do_not_insert() {
        let qtable: QTable<u8, char> = QTable::new();
        let _ = qtable.get(&1, &'L');
        let _ = qtable.values_for(&1, &['L', 'R']);
        assert!(!qtable.contains(&1, &'L'));
        assert_eq!(qtable.len(), 0);
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut qtable = QTable::new();
        let value = qtable.update(0u8, 'R', -1.0, 0.5);
        assert_eq!(value, -0.5);
        let value = qtable.update(0u8, 'R', -1.0, 0.5);
        assert_eq!(value, -0.75);
        assert_eq!(qtable.len(), 1);
        assert_eq!(qtable.state_count(), 1);
    }

    #[test]
    fn test_len_counts_pairs_across_states() {
        let mut qtable = QTable::new();
        qtable.set(0u8, 'L', 1.0);
        qtable.set(0u8, 'R', 2.0);
        qtable.set(1u8, 'L', 3.0);
        assert_eq!(qtable.len(), 3);
        assert_eq!(qtable.state_count(), 2);
        let total: f64 = qtable.iter().map(|(_, _, value)| value).sum();
        assert_eq!(total, 6.0);
    }
}
