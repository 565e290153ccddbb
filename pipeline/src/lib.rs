//! # Trendflow - tabular cleaning, growth and trend analysis
//!
//! Trendflow loads a CSV or JSON dataset, fills and normalizes its role
//! columns (group, value, date), keeps high-value records, computes growth
//! per group, then aggregates and summarizes the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / JSON  │────▶│   Parser    │────▶│  Transform  │────▶│ Aggregates  │
//! │  (any enc)  │     │  (auto-enc) │     │ (4 stages)  │     │   + Stats   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trendflow::{load_records, run, save_records, PipelineConfig};
//!
//! let records = load_records("sales.csv")?;
//! let output = run(&records, &PipelineConfig::default())?;
//! save_records("processed_data.csv", &output.records)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Records, configuration and value helpers
//! - [`logs`] - Broadcast log collaborator
//! - [`parser`] - CSV/JSON loading with auto-detection
//! - [`export`] - CSV/JSON saving
//! - [`transform`] - Imputer, standardizer, filter, growth, aggregator, pipeline
//! - [`stats`] - Descriptive statistics and time trend
//! - [`validation`] - Missing-data inspection

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// I/O
pub mod export;
pub mod parser;

// Processing
pub mod stats;
pub mod transform;

// Inspection
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, LoadError, LoadResult, PipelineError, PipelineResult, SaveError,
    SaveResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Dataset, PipelineConfig, Record, Statistic, UNKNOWN_GROUP};

// =============================================================================
// Re-exports - Loading and saving
// =============================================================================

pub use export::{save_records, save_summary};
pub use parser::{load_file, load_records, FileFormat, ParseResult};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    aggregate, compute_growth, filter_high_value, impute, process, run, standardize,
    AggregateMap, DroppedRecord, PipelineOutput, PipelineSummary, ProcessResult, StageCounts,
};

// =============================================================================
// Re-exports - Statistics
// =============================================================================

pub use stats::{compute_stats, ModeValue, StatsSummary, Trend};

// =============================================================================
// Re-exports - Inspection
// =============================================================================

pub use validation::{detect_missing, MissingCell, MissingReport};
