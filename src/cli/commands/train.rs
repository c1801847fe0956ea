//! Train command - Run a driver on a grid track and persist what it learned

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    baseline::RandomDriver,
    cli::{
        config::CommonConfig,
        output::{format_number, print_section, print_stats_table},
    },
    gridworld::{GridWorld, Move, Position},
    pipeline::{
        CsvObserver, Environment, Experiment, ExperimentConfig, ExperimentResult, MetricsObserver,
        MetricsSummary, ProgressObserver,
    },
    sarsa::{
        MAX_LEARNING_STEPS, OffPolicyNStepSarsaDriver, SarsaConfig, SavedSarsaDriver,
        TrainingMetadata,
    },
};

/// Episodes averaged for the "recent" metric
const RECENT_WINDOW: usize = 100;

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a ExperimentResult,
    metrics: MetricsSummary,
    environment: String,
    sarsa: Option<SarsaConfig>,
    seed: Option<u64>,
}

/// File the summary JSON goes to
///
/// A target ending in a path separator names a directory and receives
/// `training_summary.json`; any other target is forced to a `.json` extension.
fn summary_path(target: &Path) -> PathBuf {
    let names_directory = target
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator);
    if names_directory || target.file_name().is_none() {
        return target.join("training_summary.json");
    }

    let has_json_extension = target
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if has_json_extension {
        target.to_path_buf()
    } else {
        target.with_extension("json")
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a driver on a grid track", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Type of driver to train
    #[arg(value_enum, default_value = "sarsa")]
    pub learner: LearnerType,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Step size α (0.0-1.0]
    #[arg(long, default_value_t = 0.6)]
    pub step_size: f64,

    /// Number of steps n in each update
    #[arg(long, default_value_t = 4)]
    pub step_no: usize,

    /// Exploration rate ε of the behaviour policy (0.0-1.0)
    #[arg(long, default_value_t = 0.05)]
    pub experiment_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 1.0)]
    pub discount_factor: f64,

    /// Steps after which an episode is cut off
    #[arg(long, default_value_t = MAX_LEARNING_STEPS)]
    pub max_learning_steps: usize,

    /// Track map file (defaults to the built-in corner track)
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Probability that a move is replaced by standing still
    #[arg(long, default_value_t = 0.01)]
    pub slip: f64,

    /// Optional file for per-episode `episode,steps` rows
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Output file for the trained driver
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Continue from a previously saved driver
    #[arg(long)]
    pub resume: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LearnerType {
    /// Off-policy n-step SARSA
    Sarsa,
    /// Uniformly random legal moves, no learning
    Random,
}

impl TrainArgs {
    fn sarsa_config(&self) -> SarsaConfig {
        let config = SarsaConfig::new(
            self.step_size,
            self.step_no,
            self.experiment_rate,
            self.discount_factor,
        )
        .with_max_learning_steps(self.max_learning_steps);
        match self.common.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    fn environment_label(&self) -> String {
        self.map
            .as_ref()
            .map_or_else(|| "corner".to_string(), |path| path.display().to_string())
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    if args.learner == LearnerType::Random && (args.output.is_some() || args.resume.is_some()) {
        return Err(anyhow!(
            "Only sarsa drivers can be saved or resumed; drop --output/--resume for random"
        ));
    }

    let mut env = match &args.map {
        Some(path) => GridWorld::from_file(path, args.slip)?,
        None => GridWorld::corner(args.slip)?,
    };
    if let Some(seed) = args.common.seed {
        env = env.with_seed(seed.wrapping_add(1));
    }

    let mut experiment_config = ExperimentConfig::new(args.episodes);
    if let Some(seed) = args.common.seed {
        experiment_config = experiment_config.with_seed(seed);
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new(RECENT_WINDOW)));
    let mut experiment =
        Experiment::new(experiment_config).with_observer(Box::new(Arc::clone(&metrics)));
    if args.common.progress {
        experiment = experiment.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.csv {
        let observer = CsvObserver::new(path)
            .with_context(|| format!("Failed to open CSV output {}", path.display()))?;
        experiment = experiment.with_observer(Box::new(observer));
    }

    let result = match args.learner {
        LearnerType::Sarsa => train_sarsa(&args, &mut env, &mut experiment)?,
        LearnerType::Random => {
            let mut driver =
                RandomDriver::new(env.task()).with_max_learning_steps(args.max_learning_steps);
            experiment.run(&mut env, &mut driver)?
        }
    };

    let metrics = metrics
        .lock()
        .map_err(|_| anyhow!("Metrics observer lock poisoned"))?
        .summary();

    print_section("Training Complete");
    print_stats_table(&[
        ("Driver", result.driver.clone()),
        ("Track", args.environment_label()),
        ("Episodes", format_number(result.episodes)),
        ("Goals reached", format_number(result.goals_reached)),
        ("Mean steps", format!("{:.2}", result.mean_steps)),
        (
            "Best steps",
            metrics
                .best_steps
                .map_or_else(|| "-".to_string(), format_number),
        ),
        (
            "Recent mean steps",
            format!("{:.2}", metrics.recent_mean_steps),
        ),
    ]);

    if let Some(raw) = &args.summary {
        let path = summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: &result,
            metrics,
            environment: args.environment_label(),
            sarsa: (args.learner == LearnerType::Sarsa).then(|| args.sarsa_config()),
            seed: args.common.seed,
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        println!("✓ Summary written to: {}", path.display());
    }

    Ok(())
}

fn train_sarsa(
    args: &TrainArgs,
    env: &mut GridWorld,
    experiment: &mut Experiment,
) -> Result<ExperimentResult> {
    let config = args.sarsa_config();
    let (mut driver, prior_episodes) = match &args.resume {
        Some(path) => {
            let saved = SavedSarsaDriver::<Position, Move>::load_from_file(path)?;
            let prior = saved.metadata.episodes_trained.unwrap_or(0);
            info!(
                path = %path.display(),
                prior_episodes = prior,
                states = saved.q_table().state_count(),
                "resuming saved driver"
            );
            (saved.to_driver(env.task(), Some(config))?, prior)
        }
        None => (OffPolicyNStepSarsaDriver::new(config, env.task())?, 0),
    };

    let result = experiment.run(env, &mut driver)?;

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(prior_episodes + result.episodes),
            environment: Some(args.environment_label()),
            seed: args.common.seed,
        };
        SavedSarsaDriver::from_driver(&driver, metadata).save_to_file(path)?;
        println!("✓ Driver saved to: {}", path.display());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_path_forces_json_extension() {
        assert_eq!(
            summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            summary_path(Path::new("out/run.csv")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
    }

    #[test]
    fn test_summary_path_for_directory_target() {
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
        assert_eq!(
            summary_path(Path::new("..")),
            PathBuf::from("..").join("training_summary.json")
        );
    }

    #[test]
    fn test_defaults_match_reference_hyperparameters() {
        let args = TrainArgs::parse_from(["train"]);
        assert_eq!(args.learner, LearnerType::Sarsa);
        let config = args.sarsa_config();
        assert_eq!(config.step_size, 0.6);
        assert_eq!(config.step_no, 4);
        assert_eq!(config.experiment_rate, 0.05);
        assert_eq!(config.discount_factor, 1.0);
        assert_eq!(config.max_learning_steps, MAX_LEARNING_STEPS);
        assert_eq!(config.seed, None);
    }
}
