//! Linear trend of a value column against time.

use chrono::Datelike;
use serde::Serialize;

use crate::models::{round_to, Record};
use crate::transform::standardizer::parse_date;

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub correlation: f64,
    /// Number of points used in the fit
    pub points: usize,
}

/// Fit `ys` against `xs`.
///
/// Returns `None` with fewer than 2 points or when every `x` is equal.
/// A constant `y` yields a correlation of 0.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<Trend> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut ssx, mut ssy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        ssx += dx * dx;
        ssy += dy * dy;
        sxy += dx * dy;
    }

    if ssx == 0.0 {
        return None;
    }

    let slope = sxy / ssx;
    let correlation = if ssy == 0.0 {
        0.0
    } else {
        (sxy / (ssx * ssy).sqrt()).clamp(-1.0, 1.0)
    };

    Some(Trend {
        slope,
        intercept: mean_y - slope * mean_x,
        correlation,
        points: n,
    })
}

/// Trend of `value_column` over `date_column`, rounded to 4 decimals.
///
/// Computed only when every record carries a parseable date; records are
/// sorted by date and dates become day ordinals (0001-01-01 is day 1).
/// Degenerate inputs give an all-zero trend.
pub fn trend_over_time(records: &[Record], value_column: &str, date_column: &str) -> Trend {
    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let Some(date) = record.text(date_column).filter(|d| !d.trim().is_empty()) else {
            return Trend::default();
        };
        let Some(date) = parse_date(&date) else {
            return Trend::default();
        };
        if let Some(value) = record.number(value_column) {
            points.push((date, value));
        }
    }
    points.sort_by_key(|(date, _)| *date);

    let xs: Vec<f64> = points.iter().map(|(d, _)| f64::from(d.num_days_from_ce())).collect();
    let ys: Vec<f64> = points.iter().map(|(_, v)| *v).collect();

    match linear_regression(&xs, &ys) {
        Some(trend) => Trend {
            slope: round_to(trend.slope, 4),
            intercept: round_to(trend.intercept, 4),
            correlation: round_to(trend.correlation, 4),
            points: trend.points,
        },
        None => Trend {
            points: points.len(),
            ..Trend::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(|v| serde_json::from_value(v).unwrap()).collect()
    }

    #[test]
    fn test_perfect_line() {
        let trend = linear_regression(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 1.0).abs() < 1e-12);
        assert!((trend.correlation - 1.0).abs() < 1e-12);
        assert_eq!(trend.points, 3);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(linear_regression(&[1.0], &[1.0]).is_none());
        assert!(linear_regression(&[4.0, 4.0], &[1.0, 2.0]).is_none());

        let flat = linear_regression(&[1.0, 2.0], &[5.0, 5.0]).unwrap();
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.correlation, 0.0);
    }

    #[test]
    fn test_trend_over_time_sorts_by_date() {
        let data = records(vec![
            json!({ "sales": 300.0, "date": "2023-01-03" }),
            json!({ "sales": 100.0, "date": "2023-01-01" }),
            json!({ "sales": 200.0, "date": "2023-01-02" }),
        ]);

        let trend = trend_over_time(&data, "sales", "date");

        assert_eq!(trend.slope, 100.0);
        assert_eq!(trend.correlation, 1.0);
        assert_eq!(trend.points, 3);
    }

    #[test]
    fn test_negative_trend_rounded() {
        let data = records(vec![
            json!({ "sales": 100.0, "date": "2023-01-01" }),
            json!({ "sales": 75.0, "date": "2023-01-02" }),
            json!({ "sales": 90.0, "date": "2023-01-04" }),
        ]);

        let trend = trend_over_time(&data, "sales", "date");

        // x = 0, 1, 3 (shifted), y = 100, 75, 90: slope -75/42
        assert_eq!(trend.slope, -1.7857);
        assert_eq!(trend.correlation, -0.2168);
    }

    #[test]
    fn test_requires_every_date() {
        let data = records(vec![
            json!({ "sales": 1.0, "date": "2023-01-01" }),
            json!({ "sales": 2.0, "date": "" }),
            json!({ "sales": 3.0, "date": "2023-01-03" }),
        ]);
        assert_eq!(trend_over_time(&data, "sales", "date"), Trend::default());
    }

    #[test]
    fn test_single_point_and_same_day() {
        let one = records(vec![json!({ "sales": 1.0, "date": "2023-01-01" })]);
        let trend = trend_over_time(&one, "sales", "date");
        assert_eq!((trend.slope, trend.correlation), (0.0, 0.0));

        let same_day = records(vec![
            json!({ "sales": 1.0, "date": "2023-01-01" }),
            json!({ "sales": 9.0, "date": "2023-01-01" }),
        ]);
        let trend = trend_over_time(&same_day, "sales", "date");
        assert_eq!((trend.slope, trend.correlation), (0.0, 0.0));
        assert_eq!(trend.points, 2);
    }
}
