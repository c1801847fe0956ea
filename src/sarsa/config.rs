//! Hyperparameters for the off-policy n-step SARSA driver.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default step budget after which an episode is cut off
pub const MAX_LEARNING_STEPS: usize = 500;

/// Configuration for an [`OffPolicyNStepSarsaDriver`](super::OffPolicyNStepSarsaDriver).
///
/// # Examples
///
/// ```
/// use sarsa_lab::sarsa::SarsaConfig;
///
/// let config = SarsaConfig::new(0.6, 4, 0.05, 1.0)
///     .with_max_learning_steps(300)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarsaConfig {
    /// Learning rate α, in (0, 1]
    pub step_size: f64,
    /// Return horizon n, at least 1
    pub step_no: usize,
    /// Exploration rate ε of the behaviour policy, in [0, 1]
    pub experiment_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount_factor: f64,
    /// Control calls after which an episode is truncated
    pub max_learning_steps: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl SarsaConfig {
    pub fn new(step_size: f64, step_no: usize, experiment_rate: f64, discount_factor: f64) -> Self {
        Self {
            step_size,
            step_no,
            experiment_rate,
            discount_factor,
            max_learning_steps: MAX_LEARNING_STEPS,
            seed: None,
        }
    }

    /// Set the step budget per episode.
    pub fn with_max_learning_steps(mut self, steps: usize) -> Self {
        self.max_learning_steps = steps;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter against the range the update rule relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if self.step_no < 1 {
            return Err(Error::invalid_configuration(format!(
                "step_no must be at least 1, got {}",
                self.step_no
            )));
        }
        if !(self.step_size > 0.0 && self.step_size <= 1.0) {
            return Err(Error::invalid_configuration(format!(
                "step_size must be in (0, 1], got {}",
                self.step_size
            )));
        }
        if !(0.0..=1.0).contains(&self.experiment_rate) {
            return Err(Error::invalid_configuration(format!(
                "experiment_rate must be in [0, 1], got {}",
                self.experiment_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::invalid_configuration(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if self.max_learning_steps < 1 {
            return Err(Error::invalid_configuration(
                "max_learning_steps must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SarsaConfig {
    fn default() -> Self {
        Self::new(0.6, 4, 0.05, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SarsaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases = [
            SarsaConfig::new(0.5, 0, 0.1, 1.0),
            SarsaConfig::new(0.0, 2, 0.1, 1.0),
            SarsaConfig::new(1.2, 2, 0.1, 1.0),
            SarsaConfig::new(0.5, 2, -0.1, 1.0),
            SarsaConfig::new(0.5, 2, 1.5, 1.0),
            SarsaConfig::new(0.5, 2, 0.1, 1.01),
            SarsaConfig::new(f64::NAN, 2, 0.1, 1.0),
            SarsaConfig::new(0.5, 2, 0.1, 1.0).with_max_learning_steps(0),
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfiguration { .. }),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_boundaries() {
        assert!(SarsaConfig::new(1.0, 1, 0.0, 0.0).validate().is_ok());
        assert!(SarsaConfig::new(1.0, 1, 1.0, 1.0).validate().is_ok());
    }
}
