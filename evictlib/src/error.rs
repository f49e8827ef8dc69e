use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Everything that can go wrong while loading, generating, or simulating a trace
///
/// The engines themselves only ever produce [`SimulationError::InvalidCapacity`], and they do so
/// before touching the trace. The remaining variants come from the file plumbing around them.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("cache capacity must be at least 1, got {0}")]
    InvalidCapacity(i64),

    #[error("malformed trace at byte {offset}: {reason}")]
    TraceFormat { offset: usize, reason: String },

    #[error("invalid generator parameters: {0}")]
    InvalidParameters(String),

    #[error("malformed answer file: {0}")]
    AnswerFormat(String),

    #[error("no answer file for case at {}", .0.display())]
    MissingAnswer(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't parse the configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl SimulationError {
    pub(crate) fn trace_format(offset: usize, reason: impl Into<String>) -> Self {
        SimulationError::TraceFormat {
            offset,
            reason: reason.into(),
        }
    }
}
