//! Data loading error types
//!
//! Every variant is fatal at startup: the dashboard never runs on a partial
//! set of datasets.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading datasets, boundaries and insights
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV could not be parsed
    #[error("Failed to parse CSV {source_name}: {error}")]
    Csv { source_name: String, error: String },

    /// A required column is absent from a table
    #[error("Column {column:?} not found in {source_name}")]
    MissingColumn { source_name: String, column: String },

    /// A FIPS code appears more than once in one table
    #[error("Duplicate FIPS code {fips} in {source_name}")]
    DuplicateFips { source_name: String, fips: String },

    /// Boundary document could not be fetched
    #[error("Failed to fetch boundary document from {url}: {message}")]
    BoundaryFetch { url: String, message: String },

    /// Boundary document is not a GeoJSON feature collection
    #[error("Invalid boundary document {source_name}: {message}")]
    BoundaryFormat { source_name: String, message: String },

    /// Insight segments cannot be paired with datasets by position
    #[error("Insight file has {found} segments but {expected} datasets need one")]
    InsightCount { expected: usize, found: usize },

    /// A topic header names the same dataset twice
    #[error("Duplicate insight topic: {0}")]
    DuplicateInsight(String),

    /// Insight file mixes labeled and unlabeled segments
    #[error("Invalid insight file: {0}")]
    InsightFormat(String),

    /// A dataset has no insight segment
    #[error("No insight segment for dataset: {0}")]
    MissingInsight(String),

    /// Dataset catalog is not usable
    #[error("Invalid dataset catalog: {0}")]
    Catalog(String),
}

impl DataError {
    /// Wrap an I/O error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for data loading
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::InsightCount {
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insight file has 2 segments but 3 datasets need one"
        );

        let err = DataError::MissingColumn {
            source_name: "diabetes.csv".to_string(),
            column: "FIPS".to_string(),
        };
        assert_eq!(err.to_string(), "Column \"FIPS\" not found in diabetes.csv");
    }

    #[test]
    fn test_io_helper() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DataError::io("missing.csv", io_err);
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }
}
