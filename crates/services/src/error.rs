//! Shared error types for the services crate.

use thiserror::Error;

/// Missing or blank required configuration; fatal at startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing required configuration value {0}")]
    Missing(&'static str),
}

/// Errors emitted by the remote score store.
///
/// These are never fatal to the quiz flow; callers log them and keep the
/// last known leaderboard on screen.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoreStoreError {
    #[error("score store request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
