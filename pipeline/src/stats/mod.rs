//! Descriptive statistics and time trend of the processed value column.
//!
//! [`compute_stats`] never fails: an empty dataset yields a zeroed summary
//! whose mode is `"No data"`.

pub mod trend;

pub use trend::{linear_regression, trend_over_time, Trend};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::models::{number_value, Record};
use crate::transform::imputer::first_mode;

/// Mode of the value column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeValue {
    Value(f64),
    /// The highest frequency is shared by several values.
    NoUniqueMode,
    /// No values at all.
    NoData,
}

impl ModeValue {
    pub fn to_value(self) -> Value {
        match self {
            ModeValue::Value(v) => number_value(v),
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for ModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeValue::Value(v) => write!(f, "{}", v),
            ModeValue::NoUniqueMode => write!(f, "No unique mode"),
            ModeValue::NoData => write!(f, "No data"),
        }
    }
}

impl Serialize for ModeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Summary statistics for one value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample variance, 0 with fewer than 2 values
    pub variance: f64,
    /// Sample standard deviation, 0 with fewer than 2 values
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
    pub mode: ModeValue,
    pub trend: Trend,
}

impl StatsSummary {
    /// Summary of an empty value list.
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            median: 0.0,
            variance: 0.0,
            stdev: 0.0,
            min: 0.0,
            max: 0.0,
            mode: ModeValue::NoData,
            trend: Trend::default(),
        }
    }

    /// Descriptive statistics of `values`, without trend.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let variance = if values.len() < 2 {
            0.0
        } else {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        };

        Self {
            count: values.len(),
            mean,
            median,
            variance,
            stdev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mode: unique_mode(values),
            trend: Trend::default(),
        }
    }

    /// Flat metric map keyed like `mean_<value>`, plus `trend_slope` and
    /// `correlation_with_time`.
    pub fn to_map(&self, value_column: &str) -> Map<String, Value> {
        let mut map = Map::new();
        let metrics = [
            ("mean", self.mean),
            ("median", self.median),
            ("variance", self.variance),
            ("stdev", self.stdev),
            ("min", self.min),
            ("max", self.max),
        ];
        for (name, value) in metrics {
            map.insert(format!("{}_{}", name, value_column), number_value(value));
        }
        map.insert(format!("mode_{}", value_column), self.mode.to_value());
        map.insert("trend_slope".to_string(), number_value(self.trend.slope));
        map.insert("correlation_with_time".to_string(), number_value(self.trend.correlation));
        map
    }
}

/// Statistics of `value_column`, with a trend over `date_column`.
pub fn compute_stats(records: &[Record], value_column: &str, date_column: &str) -> StatsSummary {
    let values: Vec<f64> = records.iter().filter_map(|r| r.number(value_column)).collect();
    if values.is_empty() {
        return StatsSummary::empty();
    }

    StatsSummary {
        trend: trend_over_time(records, value_column, date_column),
        ..StatsSummary::from_values(&values)
    }
}

/// Most frequent value, first seen wins among the leaders.
///
/// `NoUniqueMode` when several distinct values all occur equally often.
fn unique_mode(values: &[f64]) -> ModeValue {
    // Collapse -0.0 onto 0.0
    let keys: Vec<String> = values
        .iter()
        .map(|&v| (if v == 0.0 { 0.0f64 } else { v }).to_string())
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in &keys {
        *counts.entry(key.as_str()).or_insert(0) += 1;
    }
    let top = counts.values().copied().max().unwrap_or(0);
    if counts.len() > 1 && counts.values().all(|&c| c == top) {
        return ModeValue::NoUniqueMode;
    }

    match first_mode(keys.iter().cloned()).and_then(|m| m.parse().ok()) {
        Some(mode) => ModeValue::Value(mode),
        None => ModeValue::NoData,
    }
}
