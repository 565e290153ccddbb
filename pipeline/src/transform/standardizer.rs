//! Type and format standardization of the three role columns.
//!
//! - value: parsed to a finite number rounded to 2 decimals
//! - group: converted to trimmed text, `"Unknown"` when absent
//! - date: parsed against [`DATE_FORMATS`] and re-emitted as `YYYY-MM-DD`
//!
//! A record whose value or date cannot be coerced is dropped, reported to the
//! log collaborator, and listed in [`StandardizeResult::dropped`].

use chrono::NaiveDate;
use serde_json::Value;

use crate::logs::{LogBroadcaster, LogEntry, LOG_BROADCASTER};
use crate::models::{number_value, round_to, value_as_number, PipelineConfig, Record, UNKNOWN_GROUP};

/// Accepted date formats, tried in order. First match wins.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Output format of standardized dates.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a record was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Value column absent or null.
    MissingValue,
    /// Value column present but not a finite number.
    InvalidNumber,
    /// Date column absent or empty.
    MissingDate,
    /// Date column matches none of the accepted formats.
    InvalidDate,
}

/// A record removed during standardization
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRecord {
    /// Position in the input dataset
    pub index: usize,
    pub column: String,
    /// Offending raw value, if any
    pub raw: Option<String>,
    pub reason: DropReason,
}

impl std::fmt::Display for DroppedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let raw = self.raw.as_deref().unwrap_or("<missing>");
        match self.reason {
            DropReason::MissingValue | DropReason::InvalidNumber => {
                write!(f, "Row {}: invalid value in '{}': '{}'", self.index, self.column, raw)
            }
            DropReason::MissingDate | DropReason::InvalidDate => {
                write!(f, "Row {}: invalid date format in '{}': '{}'", self.index, self.column, raw)
            }
        }
    }
}

/// Result of standardizing a dataset
#[derive(Debug, Clone, Default)]
pub struct StandardizeResult {
    /// Surviving records, in input order
    pub records: Vec<Record>,
    pub dropped: Vec<DroppedRecord>,
}

/// Standardize every record independently.
pub fn standardize(records: &[Record], config: &PipelineConfig) -> StandardizeResult {
    standardize_with_log(records, config, &LOG_BROADCASTER)
}

/// [`standardize`], reporting progress and drops to `log`.
pub fn standardize_with_log(
    records: &[Record],
    config: &PipelineConfig,
    log: &LogBroadcaster,
) -> StandardizeResult {
    log.log(LogEntry::info("🧹 Standardizing values, groups and dates..."));

    let mut result = StandardizeResult::default();
    for (index, record) in records.iter().enumerate() {
        match standardize_record(record, config) {
            Ok(record) => result.records.push(record),
            Err(mut dropped) => {
                dropped.index = index;
                log.log(LogEntry::warning(dropped.to_string()));
                result.dropped.push(dropped);
            }
        }
    }

    log.log(LogEntry::success(format!(
        "{} records standardized, {} dropped",
        result.records.len(),
        result.dropped.len()
    )));
    result
}

/// Standardize one record. The returned drop has `index` 0; callers set it.
pub fn standardize_record(record: &Record, config: &PipelineConfig) -> Result<Record, DroppedRecord> {
    let value = standardize_value(record.get(&config.value)).map_err(|reason| DroppedRecord {
        index: 0,
        column: config.value.clone(),
        raw: record.text(&config.value),
        reason,
    })?;

    let group = standardize_group(record.get(&config.group_by));

    let date = standardize_date(record.get(&config.date)).map_err(|reason| DroppedRecord {
        index: 0,
        column: config.date.clone(),
        raw: record.text(&config.date),
        reason,
    })?;

    Ok(record
        .with(&config.value, number_value(value))
        .with(&config.group_by, group)
        .with(&config.date, date))
}

fn standardize_value(value: Option<&Value>) -> Result<f64, DropReason> {
    match value {
        None | Some(Value::Null) => Err(DropReason::MissingValue),
        Some(v) => value_as_number(v)
            .map(|n| round_to(n, 2))
            .ok_or(DropReason::InvalidNumber),
    }
}

fn standardize_group(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_GROUP.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn standardize_date(value: Option<&Value>) -> Result<String, DropReason> {
    let raw = match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
        None | Some(Value::Null) | Some(Value::String(_)) => return Err(DropReason::MissingDate),
        Some(_) => return Err(DropReason::InvalidDate),
    };

    parse_date(raw)
        .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
        .ok_or(DropReason::InvalidDate)
}

/// Parse a date with the first matching accepted format.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
