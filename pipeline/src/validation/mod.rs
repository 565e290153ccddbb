//! Missing-data inspection.
//!
//! Reports every present cell holding a missing marker (null, blank, `NA`,
//! `N/A`) before the pipeline fills or drops anything. Absent keys are not
//! reported: there is no cell to point at.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{is_missing_value, Record};

/// A single missing cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCell {
    /// Zero-based row index in the input
    pub row: usize,
    pub column: String,
}

/// Missing cells of a dataset
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingReport {
    /// In row order, then column order
    pub cells: Vec<MissingCell>,
    pub per_column: BTreeMap<String, usize>,
}

impl MissingReport {
    pub fn total(&self) -> usize {
        self.cells.len()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Scan every present key of every record for missing markers.
pub fn detect_missing(records: &[Record]) -> MissingReport {
    let mut report = MissingReport::default();

    for (row, record) in records.iter().enumerate() {
        for (column, value) in record.iter() {
            if is_missing_value(Some(value)) {
                report.cells.push(MissingCell { row, column: column.clone() });
                *report.per_column.entry(column.clone()).or_insert(0) += 1;
            }
        }
    }

    report
}
