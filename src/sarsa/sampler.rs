//! Weighted draw of a single action from an [`ActionDistribution`]

use rand::{Rng, distr::StandardUniform};

use crate::{Error, Result, sarsa::ActionDistribution};

/// Allowed deviation of a distribution's total mass from one
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

fn validate<A: PartialEq>(distribution: &ActionDistribution<A>) -> Result<()> {
    if distribution.is_empty() {
        return Err(Error::InvalidDistribution {
            message: "no actions to choose from".to_string(),
        });
    }
    if let Some((_, bad)) = distribution
        .entries()
        .iter()
        .find(|(_, p)| !p.is_finite() || *p < 0.0)
    {
        return Err(Error::InvalidDistribution {
            message: format!("probability {bad} is not a finite non-negative number"),
        });
    }
    let total = distribution.total();
    if (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
        return Err(Error::InvalidDistribution {
            message: format!("probabilities sum to {total}, expected 1"),
        });
    }
    Ok(())
}

/// Draw one action with the probabilities of `distribution`
///
/// Walks the cumulative distribution in enumeration order. Rounding slack at
/// the top end falls to the last action with nonzero probability.
///
/// # Errors
///
/// Returns [`Error::InvalidDistribution`] if the distribution is empty, has a
/// negative or non-finite entry, or does not sum to one.
pub fn sample_action<A, R>(distribution: &ActionDistribution<A>, rng: &mut R) -> Result<A>
where
    A: Clone + PartialEq,
    R: Rng + ?Sized,
{
    validate(distribution)?;

    let ticket: f64 = rng.sample(StandardUniform);
    let mut cumulative = 0.0;
    let mut fallback = None;
    for (action, probability) in distribution.entries() {
        if *probability <= 0.0 {
            continue;
        }
        cumulative += probability;
        if ticket < cumulative {
            return Ok(action.clone());
        }
        fallback = Some(action);
    }

    fallback.cloned().ok_or_else(|| Error::InvalidDistribution {
        message: "no action has positive probability".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_certain_action_is_always_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let dist = ActionDistribution::new(vec![('L', 0.0), ('R', 1.0), ('U', 0.0)]);
        for _ in 0..200 {
            assert_eq!(sample_action(&dist, &mut rng).unwrap(), 'R');
        }
    }

    #[test]
    fn test_frequencies_follow_probabilities() {
        let mut rng = StdRng::seed_from_u64(7);
        let dist = ActionDistribution::new(vec![(0usize, 0.2), (1, 0.5), (2, 0.3)]);
        let mut counts = [0usize; 3];
        let draws = 20_000;
        for _ in 0..draws {
            counts[sample_action(&dist, &mut rng).unwrap()] += 1;
        }
        for (count, expected) in counts.iter().zip([0.2, 0.5, 0.3]) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_rejects_mass_not_summing_to_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let dist = ActionDistribution::new(vec![('L', 0.4), ('R', 0.4)]);
        let err = sample_action(&dist, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidDistribution { .. }));
    }

    #[test]
    fn test_rejects_negative_and_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        let dist = ActionDistribution::new(vec![('L', 1.5), ('R', -0.5)]);
        assert!(sample_action(&dist, &mut rng).is_err());

        let empty: ActionDistribution<char> = ActionDistribution::new(Vec::new());
        assert!(sample_action(&empty, &mut rng).is_err());
    }
}
