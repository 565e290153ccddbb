//! Sum of a value column grouped by any key column.
//!
//! Role-agnostic: the pipeline uses it once with the group column and once
//! with the date column (input for a trend line).

use std::collections::BTreeMap;

use crate::models::{Record, UNKNOWN_GROUP};

/// Key → summed value, sorted by key.
pub type AggregateMap = BTreeMap<String, f64>;

/// Sum `value_column` per distinct `key_column`.
///
/// Records without a numeric value contribute nothing and do not create a
/// key. A missing key counts as `"Unknown"`.
pub fn aggregate(records: &[Record], key_column: &str, value_column: &str) -> AggregateMap {
    records.iter().fold(AggregateMap::new(), |mut acc, record| {
        if let Some(value) = record.number(value_column) {
            let key = record.text(key_column).unwrap_or_else(|| UNKNOWN_GROUP.to_string());
            *acc.entry(key).or_insert(0.0) += value;
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(|v| serde_json::from_value(v).unwrap()).collect()
    }

    #[test]
    fn test_sum_per_key() {
        let data = records(vec![
            json!({ "region": "north", "sales": 100.0, "date": "2023-01-01" }),
            json!({ "region": "north", "sales": 75.0, "date": "2023-01-02" }),
            json!({ "region": "south", "sales": 50.0, "date": "2023-01-01" }),
        ]);

        let by_region = aggregate(&data, "region", "sales");
        assert_eq!(by_region.len(), 2);
        assert_eq!(by_region["north"], 175.0);
        assert_eq!(by_region["south"], 50.0);

        let by_date = aggregate(&data, "date", "sales");
        assert_eq!(by_date["2023-01-01"], 150.0);
        assert_eq!(by_date["2023-01-02"], 75.0);
    }

    #[test]
    fn test_missing_key_and_value() {
        let data = records(vec![
            json!({ "sales": 10.0 }),
            json!({ "region": "east" }),
            json!({ "region": "west", "sales": null }),
        ]);

        let result = aggregate(&data, "region", "sales");

        assert_eq!(result.len(), 1);
        assert_eq!(result["Unknown"], 10.0);
        assert!(!result.contains_key("east"));
        assert!(!result.contains_key("west"));
    }

    #[test]
    fn test_empty() {
        assert!(aggregate(&[], "region", "sales").is_empty());
    }
}
