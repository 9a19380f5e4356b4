//! Error types for the estimation pipeline.
//!
//! Fatal conditions abort the run before any output is written; an invalid
//! subset size only skips that size and is reported in the run summary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading data or driving the subset loop.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input path does not exist or could not be opened.
    #[error("Input file not found or unreadable: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input extension is neither csv nor parquet.
    #[error("Unsupported file format: '{extension}'. Supported formats: csv, parquet")]
    UnsupportedFormat { extension: String },

    /// The named outcome column is absent from the loaded table.
    #[error("Outcome column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingOutcomeColumn {
        column: String,
        available: Vec<String>,
    },

    /// The outcome column could not be read as numeric values.
    #[error("Outcome column '{column}' is not numeric")]
    OutcomeNotNumeric { column: String },

    /// The outcome column contains missing values; grouping requires a
    /// complete outcome vector.
    #[error("Outcome column '{column}' has {count} missing value(s)")]
    OutcomeHasMissing { column: String, count: usize },

    /// A requested subset size is outside 1..=feature_count. The size is
    /// skipped; the run continues with the remaining sizes.
    #[error("Invalid subset size {size}: must be between 1 and {feature_count} (feature count)")]
    InvalidSubsetSize { size: usize, feature_count: usize },
}
