//! Off-policy n-step SARSA for discrete control tasks
//!
//! This crate provides:
//! - A tabular off-policy n-step SARSA driver with importance-sampling correction
//! - A uniform random baseline driver
//! - A grid track environment to run drivers end to end
//! - An experiment runner with pluggable observers
//! - A `sarsa` command-line tool for training and persisting Q-tables

pub mod baseline;
pub mod cli;
pub mod error;
pub mod gridworld;
pub mod pipeline;
pub mod ports;
pub mod sarsa;

pub use baseline::RandomDriver;
pub use error::{Error, Result};
pub use sarsa::{OffPolicyNStepSarsaDriver, QTable, SarsaConfig};
