//! Observer implementations for experiments
//!
//! Observers allow composable data collection during a run without coupling
//! the runner to specific output formats.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{EpisodeSummary, Observer},
};

/// Progress bar observer - Shows experiment progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    goals: usize,
    last_steps: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            goals: 0,
            last_steps: 0,
        }
    }

    fn message(&self) -> String {
        format!("goals:{} last:{} steps", self.goals, self.last_steps)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if summary.reached_goal {
            self.goals += 1;
        }
        self.last_steps = summary.steps;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of experiment metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub goals_reached: usize,
    pub mean_steps: f64,
    pub best_steps: Option<usize>,
    /// Mean over the most recent `window` episodes
    pub recent_mean_steps: f64,
}

/// Metrics observer - Tracks steps-to-goal over a run
#[derive(Debug, Clone)]
pub struct MetricsObserver {
    steps: Vec<usize>,
    goals_reached: usize,
    window: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer averaging the last `window` episodes
    pub fn new(window: usize) -> Self {
        Self {
            steps: Vec::new(),
            goals_reached: 0,
            window: window.max(1),
        }
    }

    /// Get average episode length
    pub fn mean_steps(&self) -> f64 {
        mean(&self.steps)
    }

    /// Get average length of the most recent episodes
    pub fn recent_mean_steps(&self) -> f64 {
        let start = self.steps.len().saturating_sub(self.window);
        mean(&self.steps[start..])
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.steps.len(),
            goals_reached: self.goals_reached,
            mean_steps: self.mean_steps(),
            best_steps: self.steps.iter().copied().min(),
            recent_mean_steps: self.recent_mean_steps(),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.steps.push(summary.steps);
        if summary.reached_goal {
            self.goals_reached += 1;
        }
        Ok(())
    }
}

/// Shared handle so a caller can read metrics after handing the observer to
/// an experiment.
impl Observer for Arc<Mutex<MetricsObserver>> {
    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match self.lock() {
            Ok(mut inner) => inner.on_episode_end(episode, summary),
            Err(poisoned) => poisoned.into_inner().on_episode_end(episode, summary),
        }
    }
}

/// One row of the per-episode CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub steps: usize,
}

/// CSV observer - Writes one `episode,steps` row per episode
pub struct CsvObserver {
    writer: Writer<std::fs::File>,
}

impl CsvObserver {
    /// Create a new CSV observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }
}

impl Observer for CsvObserver {
    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.writer.serialize(EpisodeRecord {
            episode,
            steps: summary.steps,
        })?;
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
