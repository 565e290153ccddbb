//! End-to-end tests over files on disk.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use trendflow::{
    aggregate, detect_missing, load_records, run, save_records, save_summary, standardize,
    LoadError, PipelineConfig, Record, SaveError,
};

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn sales_config(threshold: f64) -> PipelineConfig {
    PipelineConfig {
        threshold,
        ..PipelineConfig::default()
    }
}

const SALES_CSV: &str = "region,sales,date\n\
                         north,100,2023-01-01\n\
                         north,,2023-01-02\n\
                         south,50,2023-01-01\n";

#[test]
fn test_csv_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sales.csv", SALES_CSV);

    let records = load_records(&input).unwrap();
    assert_eq!(records.len(), 3);

    let output = run(&records, &sales_config(60.0)).unwrap();

    assert!(output.dropped.is_empty());
    assert_eq!(output.records.len(), 2);

    let rows: Vec<(String, f64, String, f64)> = output
        .records
        .iter()
        .map(|r| {
            (
                r.text("region").unwrap(),
                r.number("sales").unwrap(),
                r.text("date").unwrap(),
                r.number("sales_growth_pct").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("north".to_string(), 100.0, "2023-01-01".to_string(), 0.0),
            ("north".to_string(), 75.0, "2023-01-02".to_string(), -25.0),
        ]
    );

    assert_eq!(output.group_aggregates.len(), 1);
    assert_eq!(output.group_aggregates["north"], 175.0);
    assert_eq!(output.date_aggregates["2023-01-01"], 100.0);
    assert_eq!(output.date_aggregates["2023-01-02"], 75.0);
    assert_eq!(output.values, vec![100.0, 75.0]);
    assert_eq!(output.stats_map["mean_sales"], json!(87.5));
    assert_eq!(output.stats_map["trend_slope"], json!(-25.0));
    assert_eq!(output.stats_map["correlation_with_time"], json!(-1.0));
}

#[test]
fn test_saved_csv_reloads_without_drops() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sales.csv", SALES_CSV);
    let saved = dir.path().join("processed_data.csv");
    let config = PipelineConfig::default();

    let output = run(&load_records(&input).unwrap(), &config).unwrap();
    save_records(&saved, &output.records).unwrap();

    let reloaded = load_records(&saved).unwrap();
    assert_eq!(reloaded.len(), output.records.len());

    let columns: Vec<&String> = reloaded[0].columns().collect();
    assert_eq!(columns, vec!["region", "sales", "date", "sales_growth_pct"]);

    for (before, after) in output.records.iter().zip(&reloaded) {
        assert_eq!(before.number("sales"), after.number("sales"));
        assert_eq!(before.text("date"), after.text("date"));
        assert_eq!(before.text("region"), after.text("region"));
    }

    let restandardized = standardize(&reloaded, &config);
    assert!(restandardized.dropped.is_empty());
}

#[test]
fn test_json_input_and_output() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "sales.JSON",
        r#"[
            {"region": "east", "sales": 10, "date": "01/02/2023"},
            {"region": null, "sales": "N/A", "date": "2023-02-02"},
            {"region": "east", "sales": 30, "date": "not a date"}
        ]"#,
    );
    let saved = dir.path().join("out.json");

    let output = run(&load_records(&input).unwrap(), &PipelineConfig::default()).unwrap();
    save_records(&saved, &output.records).unwrap();

    // Row 3 has an unparseable date and is dropped
    assert_eq!(output.dropped.len(), 1);
    assert_eq!(output.dropped[0].index, 2);

    let written: Vec<Record> = serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].text("date").as_deref(), Some("2023-02-01"));
    assert_eq!(written[1].text("region").as_deref(), Some("east"));
    assert_eq!(written[1].number("sales"), Some(20.0));
}

#[test]
fn test_nothing_survives() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sales.csv", SALES_CSV);

    let output = run(&load_records(&input).unwrap(), &sales_config(1_000.0)).unwrap();

    assert!(output.is_empty());
    assert_eq!(output.counts.filtered_out, 3);
    assert_eq!(output.stats_map["mode_sales"], json!("No data"));
}

#[test]
fn test_unsupported_formats() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sales.xlsx", "whatever");

    assert!(matches!(
        load_records(&input),
        Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
    ));
    assert!(matches!(
        save_records(dir.path().join("out.txt"), &[]),
        Err(SaveError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_semicolon_csv_with_custom_columns() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "ventes.csv",
        "store;amount;day\n\
         lyon;12;01/03/2023\n\
         lyon;18;2023-03-02\n\
         \n\
         nice;NA;2023-03-01\n",
    );

    let records = load_records(&input).unwrap();
    assert_eq!(records.len(), 3);

    let config = PipelineConfig {
        group_by: "store".to_string(),
        value: "amount".to_string(),
        date: "day".to_string(),
        ..PipelineConfig::default()
    };
    let output = run(&records, &config).unwrap();

    assert_eq!(output.group_aggregates["lyon"], 30.0);
    assert_eq!(output.group_aggregates["nice"], 15.0);
    assert_eq!(output.records[1].number("amount_growth_pct"), Some(50.0));
}

#[test]
fn test_aggregate_matches_per_key_sums() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "sales.csv",
        "region,sales,date\n\
         a,1.5,2023-01-01\n\
         b,2,2023-01-01\n\
         a,3,2023-01-02\n\
         c,oops,2023-01-02\n\
         b,4.25,2023-01-03\n",
    );
    let records = load_records(&input).unwrap();

    let totals = aggregate(&records, "region", "sales");

    for (key, total) in &totals {
        let expected: f64 = records
            .iter()
            .filter(|r| r.text("region").as_deref() == Some(key.as_str()))
            .filter_map(|r| r.number("sales"))
            .sum();
        assert_eq!(*total, expected);
    }
    assert!(!totals.contains_key("c"));
    assert_eq!(totals.len(), 2);
}

#[test]
fn test_summary_file_and_missing_report() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sales.csv", SALES_CSV);
    let summary_path = dir.path().join("summary.json");
    let config = PipelineConfig::default();

    let records = load_records(&input).unwrap();
    let report = detect_missing(&records);
    assert_eq!(report.total(), 1);
    assert_eq!(report.cells[0].row, 1);
    assert_eq!(report.cells[0].column, "sales");

    let output = run(&records, &config).unwrap();
    save_summary(&summary_path, &output.summary(&config)).unwrap();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["groupAggregates"]["north"], json!(175.0));
    assert_eq!(summary["groupAggregates"]["south"], json!(50.0));
    assert_eq!(summary["counts"]["input"], json!(3));
    assert_eq!(summary["stats"]["max_sales"], json!(100.0));
}
