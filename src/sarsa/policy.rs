//! Greedy and ε-greedy action distributions over a Q-table
//!
//! Evaluation is read-only on the table. Ties for the maximum are detected by
//! exact floating-point equality, so two values that differ only by rounding
//! are not treated as tied.

use std::{fmt::Debug, hash::Hash};

use crate::{Error, Result, sarsa::QTable};

/// Discrete distribution over an ordered set of actions
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDistribution<A> {
    entries: Vec<(A, f64)>,
}

impl<A: PartialEq> ActionDistribution<A> {
    /// Build from `(action, probability)` pairs, keeping their order
    pub fn new(entries: Vec<(A, f64)>) -> Self {
        Self { entries }
    }

    /// Probability assigned to `action` (0.0 if absent)
    pub fn probability(&self, action: &A) -> f64 {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == action)
            .map_or(0.0, |(_, probability)| *probability)
    }

    pub fn entries(&self) -> &[(A, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, probability)| probability).sum()
    }
}

/// Scale `weights` so their absolute values sum to one
///
/// An all-zero vector is returned unchanged.
pub fn normalize_l1(mut weights: Vec<f64>) -> Vec<f64> {
    let norm: f64 = weights.iter().map(|w| w.abs()).sum();
    if norm > 0.0 {
        weights.iter_mut().for_each(|w| *w /= norm);
    }
    weights
}

fn ensure_actions<S: Debug, A>(state: &S, actions: &[A]) -> Result<()> {
    if actions.is_empty() {
        return Err(Error::InvalidActionSet {
            state: format!("{state:?}"),
        });
    }
    Ok(())
}

fn greedy_weights<S, A>(q: &QTable<S, A>, state: &S, actions: &[A]) -> Vec<f64>
where
    S: Eq + Hash,
    A: Eq + Hash,
{
    let values = q.values_for(state, actions);
    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let maximal_spots = values
        .iter()
        .map(|&value| if value == best { 1.0 } else { 0.0 })
        .collect();
    normalize_l1(maximal_spots)
}

/// Target policy: uniform over the actions tied for the highest Q-value
///
/// # Errors
///
/// Returns [`Error::InvalidActionSet`] if `actions` is empty.
pub fn greedy_policy<S, A>(
    q: &QTable<S, A>,
    state: &S,
    actions: &[A],
) -> Result<ActionDistribution<A>>
where
    S: Eq + Hash + Debug,
    A: Eq + Hash + Clone,
{
    ensure_actions(state, actions)?;
    let probabilities = greedy_weights(q, state, actions);
    Ok(ActionDistribution::new(
        actions.iter().cloned().zip(probabilities).collect(),
    ))
}

/// Behaviour policy: `ε · uniform + (1 − ε) · greedy`
///
/// Every legal action receives at least `ε / |actions|`.
///
/// # Errors
///
/// Returns [`Error::InvalidActionSet`] if `actions` is empty.
pub fn epsilon_greedy_policy<S, A>(
    q: &QTable<S, A>,
    epsilon: f64,
    state: &S,
    actions: &[A],
) -> Result<ActionDistribution<A>>
where
    S: Eq + Hash + Debug,
    A: Eq + Hash + Clone,
{
    ensure_actions(state, actions)?;
    let uniform = normalize_l1(vec![1.0; actions.len()]);
    let greedy = greedy_weights(q, state, actions);
    let mixed = uniform
        .iter()
        .zip(&greedy)
        .map(|(u, g)| epsilon * u + (1.0 - epsilon) * g)
        .collect();
    Ok(ActionDistribution::new(
        actions.iter().cloned().zip(normalize_l1(mixed)).collect(),
    ))
}
