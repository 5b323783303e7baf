//! Chart builder error types

use thiserror::Error;

use crate::stats::StatsError;

/// Errors raised while building a figure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The requested column is not in the dataset
    #[error("Column {column:?} not found in dataset {dataset:?}")]
    UnknownColumn { dataset: String, column: String },

    /// The column has no values to derive a color range from
    #[error("Column {column:?} of dataset {dataset:?} has no values")]
    EmptyColumn { dataset: String, column: String },

    /// Clamp quantile outside [0, 0.5)
    #[error("Invalid clamp quantile: {0}")]
    InvalidQuantile(f64),

    /// Too few joined observations for a regression
    #[error("Insufficient data: {observations} usable observations from {joined} joined counties")]
    InsufficientData { joined: usize, observations: usize },

    /// The regression is not identifiable
    #[error("Degenerate regression: {0}")]
    Degenerate(String),

    /// Other numeric failure
    #[error("Statistics error: {0}")]
    Stats(StatsError),
}

impl ChartError {
    /// Whether the error reflects the data rather than a programming or
    /// configuration mistake; such errors are shown in place of the chart
    pub fn is_data_shortfall(&self) -> bool {
        matches!(
            self,
            ChartError::InsufficientData { .. } | ChartError::Degenerate(_)
        )
    }
}

/// Result type alias for chart building
pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChartError::InsufficientData {
            joined: 2,
            observations: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: 1 usable observations from 2 joined counties"
        );
    }

    #[test]
    fn test_data_shortfall() {
        assert!(ChartError::Degenerate("no variance in x".to_string()).is_data_shortfall());
        assert!(!ChartError::InvalidQuantile(0.9).is_data_shortfall());
    }
}
