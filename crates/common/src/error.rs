//! Error types

use thiserror::Error;

/// Main error type for the badge engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    /// A population-wide read failed; the whole ranking is abandoned
    #[error("Failed to read {name} for {metric}: {message}")]
    Source {
        name: &'static str,
        metric: String,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Tag a reader failure with the source and metric it was fetched for
    pub fn source_failed(name: &'static str, metric: impl Into<String>, err: Error) -> Self {
        match err {
            already @ Error::Source { .. } => already,
            other => Error::Source {
                name,
                metric: metric.into(),
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
