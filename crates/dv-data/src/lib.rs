//! Datasets and sample loading for probability plots

pub mod config;
pub mod datasets;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use config::NullConfig;
pub use datasets::{add_constant, longley, Dataset};
pub use sources::CsvSource;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Row {row} of column '{column}' is not numeric: '{value}'")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Column '{0}' has no values after dropping nulls")]
    EmptyColumn(String),

    #[error("Shape error: {0}")]
    Shape(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
