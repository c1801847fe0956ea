//! Shared configuration types for CLI commands

use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Common configuration shared across commands
#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommonConfig {
    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonConfig {
    /// Most detailed log level to emit
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_follows_verbosity() {
        let mut config = CommonConfig::default();
        assert_eq!(config.log_level(), Level::WARN);
        config.verbose = 1;
        assert_eq!(config.log_level(), Level::INFO);
        config.verbose = 4;
        assert_eq!(config.log_level(), Level::DEBUG);
    }
}
