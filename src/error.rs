//! Error types for the expense-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building or adjusting a forecast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// A mandatory column is entirely absent from the input schema.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Period starts are not strictly increasing.
    #[error("periods not strictly increasing at index {0}")]
    NonChronological(usize),

    /// Length mismatch between parallel sequences.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Numerical failure during decomposition or adjustment.
    #[error("computation error: {0}")]
    ComputationError(String),

    /// The external prediction service could not produce a usable
    /// response. Recovered internally by the fallback forecaster.
    #[error("prediction service unavailable: {0}")]
    PredictionUnavailable(String),

    /// I/O failure while reading input data.
    #[error("i/o error: {0}")]
    Io(String),
}
