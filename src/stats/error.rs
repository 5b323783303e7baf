//! Statistics error types

use thiserror::Error;

/// Errors raised by the numeric routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Not enough observations to estimate the model
    #[error("Insufficient data: {observations} observations, at least {required} required")]
    InsufficientData { observations: usize, required: usize },

    /// The regressor has no variance
    #[error("No variance in {0}")]
    ZeroVariance(&'static str),

    /// Input slices have different lengths
    #[error("Length mismatch: x has {x} values, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    /// Probability outside (0, 1)
    #[error("Probability out of range: {0}")]
    InvalidProbability(f64),
}

/// Result type alias for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
