//! Trendflow CLI - clean, filter and summarize tabular sales-like data
//!
//! # Commands
//!
//! ```bash
//! trendflow process sales.csv                  # Full pipeline, writes processed_data.csv
//! trendflow process sales.json --threshold 60  # Keep values above 60
//! trendflow missing sales.csv                  # Report missing cells
//! trendflow parse sales.csv                    # Just load and dump records as JSON
//! ```
//!
//! Role columns and threshold also read `TRENDFLOW_*` variables, from the
//! environment or a `.env` file.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use trendflow::{
    detect_missing, load_file, load_records, run, save_records, save_summary, AggregateMap,
    PipelineConfig, PipelineResult, Statistic,
};

/// Number of missing cells listed by `missing` before truncating
const MISSING_PREVIEW: usize = 10;

#[derive(Parser)]
#[command(name = "trendflow")]
#[command(about = "Clean, filter and summarize tabular data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: impute, standardize, filter, growth, stats
    Process {
        /// Input CSV or JSON file
        input_file: PathBuf,

        /// Grouping column
        #[arg(long = "group_by", env = "TRENDFLOW_GROUP_BY", default_value = "region")]
        group_by: String,

        /// Numeric value column
        #[arg(long, env = "TRENDFLOW_VALUE", default_value = "sales")]
        value: String,

        /// Date column
        #[arg(long, env = "TRENDFLOW_DATE", default_value = "date")]
        date: String,

        /// Keep records whose value is strictly above this
        #[arg(long, env = "TRENDFLOW_THRESHOLD", default_value = "0", allow_negative_numbers = true)]
        threshold: f64,

        /// Output file, .csv or .json
        #[arg(short, long, default_value = "processed_data.csv")]
        output: PathBuf,

        /// Statistic used to fill missing values
        #[arg(long = "impute_value", value_enum, default_value = "mean")]
        impute_value: ImputeValue,

        /// Also write aggregates and statistics as JSON
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Report cells holding missing markers
    Missing {
        /// Input CSV or JSON file
        input_file: PathBuf,
    },

    /// Load a CSV or JSON file and output records as JSON
    Parse {
        /// Input CSV or JSON file
        input_file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ImputeValue {
    Mean,
    Median,
}

impl From<ImputeValue> for Statistic {
    fn from(value: ImputeValue) -> Self {
        match value {
            ImputeValue::Mean => Statistic::Mean,
            ImputeValue::Median => Statistic::Median,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input_file,
            group_by,
            value,
            date,
            threshold,
            output,
            impute_value,
            summary,
        } => {
            let config = PipelineConfig {
                group_by,
                value,
                date,
                threshold,
                value_statistic: impute_value.into(),
            };
            cmd_process(&input_file, &config, &output, summary.as_deref())
                .map_err(|e| -> Box<dyn std::error::Error> { Box::new(e) })
        }

        Commands::Missing { input_file } => cmd_missing(&input_file),

        Commands::Parse { input_file, output } => cmd_parse(&input_file, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_process(
    input: &Path,
    config: &PipelineConfig,
    output: &Path,
    summary: Option<&Path>,
) -> PipelineResult<()> {
    eprintln!("📄 Processing: {}", input.display());

    let records = load_records(input)?;
    let result = run(&records, config)?;

    if result.is_empty() {
        println!("No data after processing.");
        return Ok(());
    }

    eprintln!(
        "\n⚙️  {} records in, {} dropped, {} filtered out, {} kept",
        result.counts.input,
        result.counts.dropped,
        result.counts.filtered_out,
        result.counts.processed
    );

    print_aggregates(&format!("Total {} by {}", config.value, config.group_by), &result.group_aggregates);
    print_aggregates(&format!("Total {} by {}", config.value, config.date), &result.date_aggregates);

    println!("\nStatistics:");
    for (name, value) in &result.stats_map {
        match value {
            Value::String(text) => println!("  {}: {}", name, text),
            other => println!("  {}: {}", name, other),
        }
    }

    save_records(output, &result.records)?;
    eprintln!("\n💾 Processed data saved to: {}", output.display());

    if let Some(path) = summary {
        save_summary(path, &result.summary(config))?;
        eprintln!("💾 Summary saved to: {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn print_aggregates(title: &str, aggregates: &AggregateMap) {
    println!("\n{}:", title);
    for (key, total) in aggregates {
        println!("  {}: {}", key, total);
    }
}

fn cmd_missing(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔍 Checking missing data: {}", input.display());

    let records = load_records(input)?;
    let report = detect_missing(&records);

    if report.is_complete() {
        eprintln!("✅ No missing data in {} records", records.len());
        return Ok(());
    }

    println!("Missing cells per column:");
    for (column, count) in &report.per_column {
        println!("  {}: {}", column, count);
    }

    println!("\nFirst missing cells:");
    for cell in report.cells.iter().take(MISSING_PREVIEW) {
        println!("  row {}, column {}", cell.row, cell.column);
    }
    if report.total() > MISSING_PREVIEW {
        println!("  ... and {} more", report.total() - MISSING_PREVIEW);
    }

    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let result = load_file(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    if let Some(delimiter) = result.delimiter {
        eprintln!("   Delimiter: '{}'", format_delimiter(delimiter));
    }
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
