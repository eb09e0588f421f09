use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading trips or writing predictions and models.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: expected {min} to {max} columns, got {got}")]
    ColumnCount {
        line: u64,
        min: usize,
        max: usize,
        got: usize,
    },

    #[error("line {line}: cannot parse {column} value {value:?} as a number")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("{trips} trips but {predictions} predictions")]
    LengthMismatch { trips: usize, predictions: usize },
}

pub type IoResult<T> = Result<T, IoError>;
