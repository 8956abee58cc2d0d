//! # maglabels
//!
//! Deduplicating magazine label sheet generator.
//!
//! Reads a semicolon-delimited catalog export (Magazine / Edition / Year),
//! filters out rows whose content hash is already in the persisted per-mode
//! seen-set, lays the remaining rows out as a label grid on A4 pages, and
//! renders the result as a PDF.
//!
//! The library side is a pure pipeline: [`catalog`] parses rows,
//! [`dedup::filter_new`] picks the never-seen ones, [`layout::layout`]
//! computes placements, and [`pdf::render`] turns placements into a
//! document. All file and console I/O lives in the binary.

use thiserror::Error as ThisError;

pub mod catalog;
pub mod dedup;
pub mod layout;
pub mod pdf;
pub mod record;

pub use dedup::{SeenSet, filter_new};
pub use layout::{LayoutConfig, LayoutMode, PageGeometry, Placement};
pub use record::Record;

/// Error type for the label pipeline.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided (bad file, missing required CSV column).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The layout configuration cannot place any label on the page.
    #[error("layout configuration error: {0}")]
    Config(String),

    /// An I/O or library operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Shorthand for wrapping a failing operation and its cause.
    pub fn op(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for label pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("no such file".to_string());
        assert_eq!(err.to_string(), "invalid input: no such file");

        let err = Error::op("read_csv", "broken pipe");
        assert_eq!(err.to_string(), "operation 'read_csv' failed: broken pipe");
    }
}
