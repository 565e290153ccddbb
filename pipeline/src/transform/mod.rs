//! Transformation module.
//!
//! Record-level stages, in pipeline order:
//! - Imputer: fill missing role columns from dataset statistics
//! - Standardizer: coerce types and formats, drop what cannot be coerced
//! - Filter: keep values above the threshold
//! - Growth: sequential percent change per group
//! - Aggregator: sum per key
//! - Pipeline: orchestration of all of the above

pub mod aggregator;
pub mod filter;
pub mod growth;
pub mod imputer;
pub mod pipeline;
pub mod standardizer;

pub use aggregator::{aggregate, AggregateMap};
pub use filter::{filter_high_value, is_above_threshold};
pub use growth::{compute_growth, growth_pct};
pub use imputer::{
    compute_fill_values, impute, impute_with_plan, FillValue, ImputationPlan, ImputationRule,
};
pub use pipeline::*;
pub use standardizer::{
    parse_date, standardize, standardize_record, standardize_with_log, DropReason, DroppedRecord, StandardizeResult,
    DATE_FORMATS,
};
