//! Subcommands of the `sarsa` binary

pub mod train;
