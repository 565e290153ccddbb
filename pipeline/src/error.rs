//! Error types for the trendflow pipeline.
//!
//! Errors are layered by concern:
//!
//! - [`LoadError`] - reading CSV/JSON sources
//! - [`SaveError`] - writing processed records and summaries
//! - [`ConfigError`] - rejected pipeline configuration
//! - [`PipelineError`] - top-level errors returned to the binary
//!
//! Per-record conversion failures are not errors: the standardizer drops the
//! record and logs a warning. Only dataset-level problems surface here.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading a dataset from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Extension is neither `.csv` nor `.json`.
    #[error("Unsupported file format '{0}'. Use CSV or JSON.")]
    UnsupportedFormat(String),

    /// Malformed CSV content.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON content.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON root is not an array.
    #[error("JSON input must be an array of objects")]
    NotAnArray,

    /// JSON array element is not an object.
    #[error("JSON element {index} is not an object")]
    NotAnObject { index: usize },

    /// CSV file without a header line.
    #[error("CSV file is empty")]
    EmptyFile,
}

// =============================================================================
// Save Errors
// =============================================================================

/// Errors while writing records or summaries.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Failed to write the file.
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    /// Extension is neither `.csv` nor `.json`.
    #[error("Unsupported output format '{0}'. Use CSV or JSON.")]
    UnsupportedFormat(String),

    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Rejected pipeline configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A role column name is empty.
    #[error("Column name for '{role}' must not be empty")]
    EmptyColumn { role: &'static str },

    /// Two roles point at the same column.
    #[error("Column '{column}' is used for more than one role")]
    DuplicateColumn { column: String },

    /// Threshold is NaN or infinite.
    #[error("Threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by the binary's commands.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading failed.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Saving failed.
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    /// Configuration rejected.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Result type for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
