//! Sequential growth per group.
//!
//! ```text
//! sorted by (group, date)          growth column
//! ┌──────────────────────────┐     ┌───────┐
//! │ north  2023-01-01  100.0 │ ──▶ │   0.0 │  first of run
//! │ north  2023-01-02   75.0 │ ──▶ │ -25.0 │  (75 - 100) / 100 * 100
//! │ south  2023-01-01   50.0 │ ──▶ │   0.0 │  state reset
//! └──────────────────────────┘     └───────┘
//! ```
//!
//! The only state carried through a run is the previous record's value.

use chrono::NaiveDate;

use super::standardizer::parse_date;
use crate::logs::log_info;
use crate::models::{number_value, round_to, PipelineConfig, Record, UNKNOWN_GROUP};

/// Percent change from `previous` to `current`.
///
/// 0 when `previous` is 0 or the change overflows `f64`.
pub fn growth_pct(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let pct = (current - previous) / previous * 100.0;
    if !pct.is_finite() {
        return 0.0;
    }
    round_to(pct, 2)
}

/// Sort by `(group, date)` and append the growth column to every record.
///
/// Malformed or absent dates sort first within their group.
pub fn compute_growth(records: &[Record], config: &PipelineConfig) -> Vec<Record> {
    let growth_column = config.growth_column();

    let mut keyed: Vec<(String, NaiveDate, &Record)> = records
        .iter()
        .map(|r| {
            let group = r.text(&config.group_by).unwrap_or_else(|| UNKNOWN_GROUP.to_string());
            let date = r
                .text(&config.date)
                .and_then(|d| parse_date(&d))
                .unwrap_or(NaiveDate::MIN);
            (group, date, r)
        })
        .collect();
    // Stable: equal (group, date) keep input order
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut output = Vec::with_capacity(keyed.len());
    let mut groups = 0;
    let mut previous: Option<(&str, f64)> = None;
    for (group, _, record) in &keyed {
        let current = record.number(&config.value).unwrap_or(0.0);
        let growth = match previous {
            Some((prev_group, prev_value)) if prev_group == group => growth_pct(prev_value, current),
            _ => {
                groups += 1;
                0.0
            }
        };
        output.push(record.with(&growth_column, number_value(growth)));
        previous = Some((group.as_str(), current));
    }

    log_info(format!("📈 Growth computed for {} records in {} groups", output.len(), groups));
    output
}
