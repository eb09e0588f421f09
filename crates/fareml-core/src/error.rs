use thiserror::Error;

/// Errors raised by tensor construction, indexing and the models built on them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TensorError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("expected a 2D matrix, got shape {0:?}")]
    NotAMatrix(Vec<usize>),

    #[error("expected a 1D vector, got shape {0:?}")]
    NotAVector(Vec<usize>),

    #[error("row {row} has {got} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("row {index} out of bounds for matrix with {rows} rows")]
    RowOutOfBounds { index: usize, rows: usize },

    #[error("feature {index} out of bounds for row of width {width}")]
    FeatureOutOfBounds { index: usize, width: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("model is not fitted")]
    NotFitted,

    #[error("no rows")]
    Empty,
}

pub type TensorResult<T> = Result<T, TensorError>;
