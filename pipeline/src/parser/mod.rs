//! Dataset loading from CSV or JSON.
//!
//! CSV input goes through encoding and delimiter auto-detection, then every
//! row becomes a [`Record`] of text values keyed by the header. JSON input
//! must be an array of flat objects. Any other extension is rejected before
//! the pipeline starts.

use serde_json::Value;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{Dataset, Record};

/// Candidate CSV delimiters, in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Supported file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Format of `path` from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Extension of `path` for error messages.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string()
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub records: Dataset,
    /// Detected encoding (`utf-8` for JSON)
    pub encoding: String,
    /// Detected delimiter, CSV only
    pub delimiter: Option<char>,
    /// CSV header, or keys of the first JSON object
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes with the given encoding, lossy on invalid sequences.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let codec = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        _ => encoding_rs::UTF_8,
    };
    codec.decode(bytes).0.into_owned()
}

/// Delimiter occurring most often in the header line; `,` if none.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = DELIMITERS[0];
    let mut best_count = 0;
    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into records.
///
/// Short rows are padded with empty cells; extra cells are ignored.
pub fn parse_csv_str(content: &str, delimiter: char) -> LoadResult<(Vec<String>, Dataset)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyFile);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), Value::String(row.get(i).unwrap_or("").to_string())))
            .collect();
        records.push(record);
    }

    Ok((headers, records))
}

/// Parse a JSON array of flat objects into records.
pub fn parse_json_str(content: &str) -> LoadResult<Dataset> {
    let Value::Array(items) = serde_json::from_str::<Value>(content)? else {
        return Err(LoadError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(Record::from(map)),
            _ => Err(LoadError::NotAnObject { index }),
        })
        .collect()
}

/// Parse raw bytes of a known format.
pub fn parse_bytes(bytes: &[u8], format: FileFormat) -> LoadResult<ParseResult> {
    match format {
        FileFormat::Csv => {
            let encoding = detect_encoding(bytes);
            let content = decode_content(bytes, &encoding);
            let delimiter = detect_delimiter(&content);
            let (headers, records) = parse_csv_str(&content, delimiter)?;
            Ok(ParseResult {
                records,
                encoding,
                delimiter: Some(delimiter),
                headers,
            })
        }
        FileFormat::Json => {
            let content = decode_content(bytes, "utf-8");
            let records = parse_json_str(&content)?;
            let headers = records
                .first()
                .map(|r| r.columns().cloned().collect())
                .unwrap_or_default();
            Ok(ParseResult {
                records,
                encoding: "utf-8".to_string(),
                delimiter: None,
                headers,
            })
        }
    }
}

/// Load a CSV or JSON file with metadata.
///
/// Fails with [`LoadError::UnsupportedFormat`] before reading anything when
/// the extension is not `.csv` or `.json`.
pub fn load_file<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(extension_of(path)))?;

    let bytes = std::fs::read(path)?;
    parse_bytes(&bytes, format)
}

/// Load a CSV or JSON file as records.
pub fn load_records<P: AsRef<Path>>(path: P) -> LoadResult<Dataset> {
    Ok(load_file(path)?.records)
}
