//! View error types

use thiserror::Error;

use crate::charts::ChartError;
use crate::data::DataError;

/// Errors raised while building or updating the dashboard view
#[derive(Error, Debug)]
pub enum ViewError {
    /// Context construction failed while loading data
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A figure could not be built
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// The named dataset is not in the catalog (or not allowed here)
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// No insight segment for the named dataset
    #[error("No insight for dataset: {0}")]
    MissingInsight(String),

    /// A control received a value it cannot hold
    #[error("Invalid value for {control}: {message}")]
    InvalidControl { control: String, message: String },
}

/// Result type alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;
