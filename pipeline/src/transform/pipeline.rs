//! Pipeline orchestration.
//!
//! Runs the stages in fixed order:
//!
//! ```text
//! raw ─▶ impute ─▶ standardize ─▶ filter ─▶ growth ─┬─▶ aggregate (group, date)
//!                       │                            └─▶ stats + trend
//!                       └─▶ dropped records
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use trendflow::{load_records, run, PipelineConfig};
//!
//! let records = load_records("sales.csv")?;
//! let output = run(&records, &PipelineConfig::default())?;
//! if !output.is_empty() {
//!     println!("{:?}", output.group_aggregates);
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use super::aggregator::{aggregate, AggregateMap};
use super::filter::filter_high_value;
use super::growth::compute_growth;
use super::imputer::impute;
use super::standardizer::{standardize, DroppedRecord};
use crate::error::ConfigResult;
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::{PipelineConfig, Record};
use crate::stats::{compute_stats, StatsSummary};

/// Record counts after each stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    pub input: usize,
    pub standardized: usize,
    pub dropped: usize,
    pub filtered_out: usize,
    pub processed: usize,
}

/// Output of the record-level stages
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Records with the growth column, sorted by group then date
    pub records: Vec<Record>,
    /// Records removed by the standardizer
    pub dropped: Vec<DroppedRecord>,
    pub counts: StageCounts,
}

/// Everything handed to output collaborators
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<Record>,
    pub dropped: Vec<DroppedRecord>,
    pub counts: StageCounts,
    /// Value summed per group
    pub group_aggregates: AggregateMap,
    /// Value summed per date, input for a trend line
    pub date_aggregates: AggregateMap,
    /// Value column of every processed record, input for a histogram
    pub values: Vec<f64>,
    pub stats: StatsSummary,
    /// Flat metric map keyed like `mean_sales`
    pub stats_map: Map<String, Value>,
}

/// Serializable aggregates and statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary<'a> {
    pub config: &'a PipelineConfig,
    pub counts: StageCounts,
    pub group_aggregates: &'a AggregateMap,
    pub date_aggregates: &'a AggregateMap,
    pub stats: &'a Map<String, Value>,
}

impl PipelineOutput {
    /// `true` when no record survived; callers skip output/visualization.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary<'a>(&'a self, config: &'a PipelineConfig) -> PipelineSummary<'a> {
        PipelineSummary {
            config,
            counts: self.counts,
            group_aggregates: &self.group_aggregates,
            date_aggregates: &self.date_aggregates,
            stats: &self.stats_map,
        }
    }
}

/// Impute, standardize, filter and compute growth.
pub fn process(records: &[Record], config: &PipelineConfig) -> ProcessResult {
    log_info(format!("📖 {} input records", records.len()));

    let imputed = impute(records, config);
    let standardized = standardize(&imputed, config);
    let filtered = filter_high_value(&standardized.records, config);
    let processed = compute_growth(&filtered, config);

    let counts = StageCounts {
        input: records.len(),
        standardized: standardized.records.len(),
        dropped: standardized.dropped.len(),
        filtered_out: standardized.records.len() - filtered.len(),
        processed: processed.len(),
    };

    ProcessResult {
        records: processed,
        dropped: standardized.dropped,
        counts,
    }
}

/// Run the full pipeline, including aggregates and statistics.
pub fn run(records: &[Record], config: &PipelineConfig) -> ConfigResult<PipelineOutput> {
    if let Err(e) = config.validate() {
        log_error(format!("Invalid configuration: {}", e));
        return Err(e);
    }

    let ProcessResult { records, dropped, counts } = process(records, config);

    if records.is_empty() {
        log_warning("No records left after processing");
    }

    let group_aggregates = aggregate(&records, &config.group_by, &config.value);
    let date_aggregates = aggregate(&records, &config.date, &config.value);
    let values: Vec<f64> = records.iter().filter_map(|r| r.number(&config.value)).collect();
    let stats = compute_stats(&records, &config.value, &config.date);
    let stats_map = stats.to_map(&config.value);

    log_success(format!(
        "{} records processed, {} groups, {} dates",
        records.len(),
        group_aggregates.len(),
        date_aggregates.len()
    ));

    Ok(PipelineOutput {
        records,
        dropped,
        counts,
        group_aggregates,
        date_aggregates,
        values,
        stats,
        stats_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(|v| serde_json::from_value(v).unwrap()).collect()
    }

    #[test]
    fn test_process_counts() {
        let data = records(vec![
            json!({ "region": "a", "sales": "10", "date": "2023-01-01" }),
            json!({ "region": "a", "sales": "x", "date": "2023-01-02" }),
            json!({ "region": "b", "sales": "-5", "date": "2023-01-01" }),
        ]);

        let result = process(&data, &PipelineConfig::default());

        assert_eq!(
            result.counts,
            StageCounts {
                input: 3,
                standardized: 2,
                dropped: 1,
                filtered_out: 1,
                processed: 1,
            }
        );
        assert_eq!(result.dropped[0].index, 1);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = PipelineConfig {
            threshold: f64::NAN,
            ..PipelineConfig::default()
        };
        let err = run(&[], &config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));
    }

    #[test]
    fn test_run_empty_is_not_an_error() {
        let data = records(vec![json!({ "region": "a", "sales": "1", "date": "2023-01-01" })]);
        let config = PipelineConfig {
            threshold: 1000.0,
            ..PipelineConfig::default()
        };

        let output = run(&data, &config).unwrap();

        assert!(output.is_empty());
        assert!(output.group_aggregates.is_empty());
        assert_eq!(output.stats_map["mode_sales"], json!("No data"));
    }

    #[test]
    fn test_summary_serializes() {
        let data = records(vec![
            json!({ "region": "a", "sales": "10", "date": "2023-01-01" }),
            json!({ "region": "b", "sales": "20", "date": "2023-01-02" }),
        ]);
        let config = PipelineConfig::default();
        let output = run(&data, &config).unwrap();

        let json = serde_json::to_value(output.summary(&config)).unwrap();

        assert_eq!(json["groupAggregates"]["a"], json!(10.0));
        assert_eq!(json["dateAggregates"]["2023-01-02"], json!(20.0));
        assert_eq!(json["stats"]["mean_sales"], json!(15.0));
        assert_eq!(json["counts"]["processed"], 2);
        assert_eq!(json["config"]["groupBy"], "region");
    }
}
