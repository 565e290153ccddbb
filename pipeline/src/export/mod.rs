//! Writing processed records and run summaries.
//!
//! Output format follows the extension, like loading: `.csv` writes the
//! union of all columns in first-seen order, `.json` a pretty array.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{SaveError, SaveResult};
use crate::models::Record;
use crate::parser::{extension_of, FileFormat};

/// Union of record columns, in first-seen order.
pub fn collect_headers(records: &[Record]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for column in record.columns() {
            if !headers.iter().any(|h| h == column) {
                headers.push(column.clone());
            }
        }
    }
    headers
}

/// Text of a value in a CSV cell; null and absent cells are empty.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render records as CSV text.
pub fn records_to_csv(records: &[Record]) -> SaveResult<String> {
    let headers = collect_headers(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !headers.is_empty() {
        writer.write_record(&headers)?;
    }
    for record in records {
        writer.write_record(headers.iter().map(|h| cell_text(record.get(h))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SaveError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Save records to `.csv` or `.json`.
pub fn save_records<P: AsRef<Path>>(path: P, records: &[Record]) -> SaveResult<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| SaveError::UnsupportedFormat(extension_of(path)))?;

    let content = match format {
        FileFormat::Csv => records_to_csv(records)?,
        FileFormat::Json => serde_json::to_string_pretty(records)?,
    };
    fs::write(path, content)?;
    Ok(())
}

/// Save any serializable summary as pretty JSON.
pub fn save_summary<P: AsRef<Path>, T: Serialize>(path: P, summary: &T) -> SaveResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}
