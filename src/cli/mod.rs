//! CLI infrastructure for the SARSA experimentation toolkit
//!
//! This module provides the command-line interface for training drivers on
//! grid tracks and persisting what they learned.

pub mod commands;
pub mod config;
pub mod output;
