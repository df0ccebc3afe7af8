use thiserror::Error;

/// Errors surfaced by the matching core
///
/// Parameter and input errors are raised before any matrix work begins.
/// Non-convergence is never an error; it is reported through `SinkhornReport`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty input: at least one item is required")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}x{expected} matrix, got {rows}x{cols}")]
    DimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Duplicate item id: {0}")]
    DuplicateId(String),

    #[error("Invalid cost {value} at ({row}, {col}): scores must be non-negative numbers")]
    InvalidCost { row: usize, col: usize, value: f64 },
}

pub type Result<T> = std::result::Result<T, MatchingError>;

impl MatchingError {
    /// Short machine-readable kind, used as the `error` field of API responses
    pub fn kind(&self) -> &'static str {
        match self {
            MatchingError::InvalidParameter(_) => "invalid_parameter",
            MatchingError::EmptyInput => "empty_input",
            MatchingError::DimensionMismatch { .. } => "dimension_mismatch",
            MatchingError::DuplicateId(_) => "duplicate_id",
            MatchingError::InvalidCost { .. } => "invalid_cost",
        }
    }
}
