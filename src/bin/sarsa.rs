//! SARSA CLI - Train and persist tabular control drivers
//!
//! This CLI provides a unified interface for:
//! - Training off-policy n-step SARSA or a random baseline on grid tracks
//! - Writing per-episode CSV and summary JSON for later analysis
//! - Saving and resuming learned Q-tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use sarsa_lab::cli::commands::train::{TrainArgs, execute};

#[derive(Parser)]
#[command(name = "sarsa")]
#[command(version, about = "Off-policy n-step SARSA experimentation toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a driver on a grid track
    Train(Box<TrainArgs>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => {
            tracing_subscriber::fmt()
                .with_max_level(args.common.log_level())
                .with_writer(std::io::stderr)
                .init();
            execute(*args)
        }
    }
}
