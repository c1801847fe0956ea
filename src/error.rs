//! Error types for the sarsa-lab crate

use thiserror::Error;

/// Main error type for the sarsa-lab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state '{state}' has no legal actions")]
    InvalidActionSet { state: String },

    #[error("invalid action distribution: {message}")]
    InvalidDistribution { message: String },

    #[error("history for step {step} was evicted from a window of {window} slots")]
    HistoryEvicted { step: usize, window: usize },

    #[error("control called before start_attempt")]
    NoActiveEpisode,

    #[error("invalid map: {message}")]
    InvalidMap { message: String },

    #[error("episode {episode} did not finish within {limit} control calls")]
    EpisodeOverrun { episode: usize, limit: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
