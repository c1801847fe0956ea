//! Experiment pipeline
//!
//! This module provides:
//! - An episode runner that drives any [`Driver`] against any [`Environment`]
//! - Observers for progress display, metrics and per-episode CSV output

pub mod experiment;
pub mod observers;

pub use experiment::{ALMOST_INFINITE_STEP, Experiment, ExperimentConfig, ExperimentResult};
pub use observers::{
    CsvObserver, EpisodeRecord, MetricsObserver, MetricsSummary, ProgressObserver,
};

pub use crate::ports::{Driver, Environment, Observer};
