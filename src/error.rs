//! Error types for the task engine.
//!
//! File-level failures are `TodoError`; token-level failures while reading a
//! single line are `ParseFailure` and never leave the parser.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by loading, saving and mutating the task files.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(
        "The file '{}' does not exist. Are you sure you specified the correct path?",
        .0.display()
    )]
    FileNotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    FileWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No task on line {0}")]
    NoSuchTask(usize),

    #[error("The task on line {0} was changed by another program; list the tasks and try again")]
    TaskChanged(usize),

    #[error("Invalid settings in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl TodoError {
    /// Whether the in-memory state is still intact and a save can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TodoError::FileWriteFailure { .. })
    }
}

/// A malformed tag value. Recovered locally by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("unrecognized date expression `{0}`")]
    Date(String),

    #[error("invalid recurrence pattern `{0}`")]
    Recurrence(String),
}

pub type Result<T> = std::result::Result<T, TodoError>;
