//! Domain models for the trendflow pipeline.
//!
//! - [`Record`] - one row: ordered column name → scalar value
//! - [`Dataset`] - ordered sequence of records
//! - [`PipelineConfig`] - role columns, threshold and imputation statistic
//! - [`Statistic`] - statistic used to fill a column

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// Text markers treated as "no value" in any column.
pub const MISSING_MARKERS: [&str; 2] = ["NA", "N/A"];

/// Default category for records without a group key.
pub const UNKNOWN_GROUP: &str = "Unknown";

// =============================================================================
// Record
// =============================================================================

/// A single tabular row.
///
/// Values are scalars: text, number, or null. Column order is preserved from
/// the source. Stages never mutate a record in place; [`Record::with`] returns
/// a modified copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// An ordered sequence of records.
pub type Dataset = Vec<Record>;

impl Record {
    /// Raw value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Textual form of a column.
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON form.
    /// Null and absent columns yield `None`.
    pub fn text(&self, column: &str) -> Option<String> {
        match self.0.get(column)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Numeric form of a column.
    ///
    /// Numbers pass through; text is trimmed and parsed. Non-finite results
    /// are rejected.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.0.get(column).and_then(value_as_number)
    }

    /// `true` if the column is absent, null, blank, or a missing marker.
    pub fn is_missing(&self, column: &str) -> bool {
        is_missing_value(self.0.get(column))
    }

    /// Copy of this record with `column` set to `value`.
    ///
    /// Existing columns keep their position; new columns are appended.
    pub fn with(&self, column: &str, value: impl Into<Value>) -> Record {
        let mut map = self.0.clone();
        map.insert(column.to_string(), value.into());
        Record(map)
    }

    /// Column names in source order.
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// `true` for absent, null, blank text, `NA` and `N/A`.
pub fn is_missing_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
        }
        Some(_) => false,
    }
}

/// Finite numeric value of a scalar, parsing text if needed.
pub fn value_as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Round half away from zero to `places` decimals.
///
/// Values too large to scale are returned unchanged; they have no
/// fractional digits left to round anyway.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// JSON number for a finite float; non-finite input maps to null.
pub fn number_value(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

// =============================================================================
// Configuration
// =============================================================================

/// Statistic used to fill missing cells of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Arithmetic mean of the numeric values.
    #[default]
    Mean,
    /// Median of the numeric values.
    Median,
    /// Most frequent value, first seen wins on ties.
    Mode,
}

/// Pipeline configuration, passed explicitly to every stage.
///
/// The threshold defaults to `0.0`, so only non-positive values are filtered
/// out unless the caller raises it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Grouping/category column.
    pub group_by: String,

    /// Numeric value column.
    pub value: String,

    /// Date column.
    pub date: String,

    /// Records with value <= threshold are filtered out.
    pub threshold: f64,

    /// Statistic used to impute the value column.
    #[serde(default)]
    pub value_statistic: Statistic,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            group_by: "region".to_string(),
            value: "sales".to_string(),
            date: "date".to_string(),
            threshold: 0.0,
            value_statistic: Statistic::Mean,
        }
    }
}

impl PipelineConfig {
    /// Name of the column added by the growth stage.
    pub fn growth_column(&self) -> String {
        format!("{}_growth_pct", self.value)
    }

    /// Reject empty or clashing role columns and non-finite thresholds.
    pub fn validate(&self) -> ConfigResult<()> {
        let roles = [
            ("group_by", &self.group_by),
            ("value", &self.value),
            ("date", &self.date),
        ];

        for (role, column) in roles {
            if column.trim().is_empty() {
                return Err(ConfigError::EmptyColumn { role });
            }
        }

        for (i, (_, a)) in roles.iter().enumerate() {
            if roles[i + 1..].iter().any(|(_, b)| a == b) {
                return Err(ConfigError::DuplicateColumn {
                    column: a.to_string(),
                });
            }
        }

        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }

        Ok(())
    }
}
