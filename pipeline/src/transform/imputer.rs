//! Missing-value imputation.
//!
//! Fill values are computed once from the input dataset, then applied to
//! every record in a single pass. An [`ImputationPlan`] lists the columns to
//! fill in order; each column's statistic only ever sees the original data,
//! so the order of rules does not change the result.

use serde_json::Value;
use std::collections::HashMap;

use crate::logs::{log_info, log_info_indent};
use crate::models::{
    is_missing_value, number_value, round_to, value_as_number, PipelineConfig, Record, Statistic,
    UNKNOWN_GROUP,
};

/// Text sentinel meaning "no value" in numeric columns.
pub const NUMERIC_SENTINEL: &str = "0";

/// One column to fill.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationRule {
    pub column: String,
    pub statistic: Statistic,
    /// Parse values as numbers and treat the `"0"` sentinel as missing.
    pub numeric: bool,
    /// Used when the column has no usable value at all.
    pub fallback: Option<Value>,
}

/// Ordered list of columns to fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputationPlan {
    rules: Vec<ImputationRule>,
}

impl ImputationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard plan for the three roles: value (numeric), group, date.
    pub fn for_config(config: &PipelineConfig) -> Self {
        Self::new()
            .with_rule(ImputationRule {
                column: config.value.clone(),
                statistic: config.value_statistic,
                numeric: true,
                fallback: Some(number_value(0.0)),
            })
            .with_rule(ImputationRule {
                column: config.group_by.clone(),
                statistic: Statistic::Mode,
                numeric: false,
                fallback: Some(Value::String(UNKNOWN_GROUP.to_string())),
            })
            .with_rule(ImputationRule {
                column: config.date.clone(),
                statistic: Statistic::Mode,
                numeric: false,
                fallback: None,
            })
    }

    pub fn with_rule(mut self, rule: ImputationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ImputationRule] {
        &self.rules
    }
}

/// Fill value computed for one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FillValue {
    pub column: String,
    /// `None` leaves gaps untouched.
    pub value: Option<Value>,
}

/// Impute the role columns of `config` with the standard plan.
pub fn impute(records: &[Record], config: &PipelineConfig) -> Vec<Record> {
    impute_with_plan(records, &ImputationPlan::for_config(config))
}

/// Impute with an explicit plan.
pub fn impute_with_plan(records: &[Record], plan: &ImputationPlan) -> Vec<Record> {
    log_info("🩹 Imputing missing values...");

    let fills = compute_fill_values(records, plan);
    for (rule, fill) in plan.rules().iter().zip(&fills) {
        let gaps = records.iter().filter(|r| is_gap(r.get(&rule.column), rule.numeric)).count();
        match &fill.value {
            Some(v) => log_info_indent(
                format!("{}: {} missing, filled with {} ({:?})", rule.column, gaps, v, rule.statistic),
                1,
            ),
            None => log_info_indent(format!("{}: {} missing, no fill value", rule.column, gaps), 1),
        }
    }

    records
        .iter()
        .map(|record| {
            plan.rules()
                .iter()
                .zip(&fills)
                .fold(record.clone(), |acc, (rule, fill)| match &fill.value {
                    Some(v) if is_gap(acc.get(&rule.column), rule.numeric) => acc.with(&rule.column, v.clone()),
                    _ => acc,
                })
        })
        .collect()
}

/// Compute every rule's fill value from the original records.
pub fn compute_fill_values(records: &[Record], plan: &ImputationPlan) -> Vec<FillValue> {
    plan.rules()
        .iter()
        .map(|rule| FillValue {
            column: rule.column.clone(),
            value: compute_statistic(records, rule).or_else(|| rule.fallback.clone()),
        })
        .collect()
}

fn compute_statistic(records: &[Record], rule: &ImputationRule) -> Option<Value> {
    let present = records
        .iter()
        .filter_map(|r| r.get(&rule.column))
        .filter(|v| !is_gap(Some(*v), rule.numeric));

    if rule.numeric {
        let numbers: Vec<f64> = present.filter_map(value_as_number).collect();
        let stat = match rule.statistic {
            Statistic::Mean => mean(&numbers)?,
            Statistic::Median => median(&numbers)?,
            Statistic::Mode => {
                let mode = first_mode(numbers.iter().map(|n| n.to_string()))?;
                mode.parse().ok()?
            }
        };
        Some(number_value(round_to(stat, 2)))
    } else {
        let texts = present.map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        match rule.statistic {
            Statistic::Mode => first_mode(texts).map(Value::String),
            // Only the parseable cells of a text column count.
            Statistic::Mean | Statistic::Median => {
                let numbers: Vec<f64> = texts.filter_map(|t| t.trim().parse().ok()).collect();
                let stat = if rule.statistic == Statistic::Mean { mean(&numbers)? } else { median(&numbers)? };
                Some(number_value(round_to(stat, 2)))
            }
        }
    }
}

/// Missing cell, counting the `"0"` sentinel for numeric columns.
fn is_gap(value: Option<&Value>, numeric: bool) -> bool {
    if is_missing_value(value) {
        return true;
    }
    numeric && matches!(value, Some(Value::String(s)) if s.trim() == NUMERIC_SENTINEL)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent item; on a tie the one seen first wins.
pub(crate) fn first_mode<I>(items: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(item, _)| item)
}
