//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing experiment events,
//! allowing composable data collection without coupling the runner to
//! specific output formats or metrics.

use serde::{Deserialize, Serialize};

use crate::Result;

/// What happened in one finished episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Environment steps taken before the episode ended
    pub steps: usize,
    /// Undiscounted sum of rewards received
    pub total_reward: f64,
    /// Whether the goal was reached (as opposed to a step-budget cutoff)
    pub reached_goal: bool,
}

/// Observer trait for monitoring experiments
///
/// # Event Sequence
///
/// 1. `on_run_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each environment step
///    - `on_episode_end(episode, summary)`
/// 3. `on_run_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use sarsa_lab::ports::{EpisodeSummary, Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _summary: &EpisodeSummary,
///     ) -> sarsa_lab::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when the run starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_run_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based index).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every environment step with the reward it produced.
    fn on_step(&mut self, _episode: usize, _step: usize, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called once the driver reports the episode finished.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when the run completes.
    ///
    /// Use this to flush outputs or display summaries.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
