//! Experiment runner: drives one learner against one environment

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    ports::{Driver, Environment, EpisodeSummary, Observer, Task},
};

/// Control calls after which an episode is abandoned as runaway
pub const ALMOST_INFINITE_STEP: usize = 10_000;

type StateOf<E> = <<E as Environment>::Task as Task>::State;
type ActionOf<E> = <<E as Environment>::Task as Task>::Action;

/// Experiment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of episodes to run
    pub number_of_episodes: usize,

    /// Seed handed to the driver before the first episode
    pub seed: Option<u64>,

    /// Hard cap on control calls per episode
    pub max_control_calls: usize,
}

impl ExperimentConfig {
    pub fn new(number_of_episodes: usize) -> Self {
        Self {
            number_of_episodes,
            seed: None,
            max_control_calls: ALMOST_INFINITE_STEP,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_control_calls(mut self, calls: usize) -> Self {
        self.max_control_calls = calls;
        self
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new(10_000)
    }
}

/// Result of an experiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Driver that was run
    pub driver: String,

    /// Episodes completed
    pub episodes: usize,

    /// Episodes that reached the goal before the step budget ran out
    pub goals_reached: usize,

    /// Mean environment steps per episode
    pub mean_steps: f64,

    /// Environment steps of each episode, in order
    pub steps_per_episode: Vec<usize>,
}

impl ExperimentResult {
    fn new(driver: String, summaries: &[EpisodeSummary]) -> Self {
        let steps_per_episode: Vec<usize> = summaries.iter().map(|s| s.steps).collect();
        let mean_steps = if steps_per_episode.is_empty() {
            0.0
        } else {
            steps_per_episode.iter().sum::<usize>() as f64 / steps_per_episode.len() as f64
        };
        Self {
            driver,
            episodes: summaries.len(),
            goals_reached: summaries.iter().filter(|s| s.reached_goal).count(),
            mean_steps,
            steps_per_episode,
        }
    }
}

/// Runs a fixed number of episodes, one environment and one driver at a time
///
/// Per episode: reset the environment, `start_attempt`, then alternate
/// environment steps and `control` calls until the driver reports
/// `finished_learning`. Once the environment is done, further `control` calls
/// repeat the last state and reward without stepping it, so the driver can
/// drain its trailing updates.
pub struct Experiment {
    config: ExperimentConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the experiment
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn run<E, D>(&mut self, env: &mut E, driver: &mut D) -> Result<ExperimentResult>
    where
        E: Environment,
        D: Driver<State = StateOf<E>, Action = ActionOf<E>> + ?Sized,
    {
        if let Some(seed) = self.config.seed {
            driver.set_rng_seed(seed);
        }

        info!(
            driver = driver.name(),
            episodes = self.config.number_of_episodes,
            "starting experiment"
        );
        for observer in &mut self.observers {
            observer.on_run_start(self.config.number_of_episodes)?;
        }

        let mut summaries = Vec::with_capacity(self.config.number_of_episodes);
        for episode in 0..self.config.number_of_episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let summary = self.run_episode(episode, env, driver)?;
            debug!(
                episode,
                steps = summary.steps,
                reached_goal = summary.reached_goal,
                "episode complete"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }
            summaries.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        let result = ExperimentResult::new(driver.name().to_string(), &summaries);
        info!(
            driver = %result.driver,
            mean_steps = result.mean_steps,
            goals_reached = result.goals_reached,
            "experiment finished"
        );
        Ok(result)
    }

    fn run_episode<E, D>(
        &mut self,
        episode: usize,
        env: &mut E,
        driver: &mut D,
    ) -> Result<EpisodeSummary>
    where
        E: Environment,
        D: Driver<State = StateOf<E>, Action = ActionOf<E>> + ?Sized,
    {
        let mut state = env.reset();
        let mut action = driver.start_attempt(&state)?;

        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut last_reward = 0.0;
        let mut done = false;
        let mut calls = 0;

        while !driver.finished_learning() {
            if calls == self.config.max_control_calls {
                return Err(Error::EpisodeOverrun {
                    episode,
                    limit: self.config.max_control_calls,
                });
            }

            if !done {
                let transition = env.step(&action)?;
                state = transition.state;
                last_reward = transition.reward;
                done = transition.done;
                total_reward += transition.reward;

                for observer in &mut self.observers {
                    observer.on_step(episode, steps, last_reward)?;
                }
                steps += 1;
            }

            action = driver.control(&state, last_reward)?;
            calls += 1;
        }

        Ok(EpisodeSummary {
            steps,
            total_reward,
            reached_goal: done,
        })
    }
}
