//! High-value filter.

use crate::logs::log_info;
use crate::models::{PipelineConfig, Record};

/// `true` if the record's value is strictly above `threshold`.
/// A missing or non-numeric value compares as 0.
pub fn is_above_threshold(record: &Record, value_column: &str, threshold: f64) -> bool {
    record.number(value_column).unwrap_or(0.0) > threshold
}

/// Keep records whose value exceeds the configured threshold.
pub fn filter_high_value(records: &[Record], config: &PipelineConfig) -> Vec<Record> {
    let kept: Vec<Record> = records
        .iter()
        .filter(|r| is_above_threshold(r, &config.value, config.threshold))
        .cloned()
        .collect();

    log_info(format!(
        "🔎 Filter {} > {}: kept {} of {}",
        config.value,
        config.threshold,
        kept.len(),
        records.len()
    ));
    kept
}
