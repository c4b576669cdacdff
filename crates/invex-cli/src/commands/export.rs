//! Export command - turn a saved invoice record into spreadsheet CSV.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use invex_core::export::csv;
use invex_core::InvoiceRecord;

use super::config;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Invoice record as JSON (e.g. from `invex process --format json`)
    #[arg(required = true)]
    input: PathBuf,

    /// Directory for the CSV file (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the CSV to stdout instead of writing a file
    #[arg(long, conflicts_with = "output_dir")]
    stdout: bool,
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let content = fs::read_to_string(&args.input)?;
    let record: InvoiceRecord = serde_json::from_str(&content).map_err(|e| {
        anyhow::anyhow!("Invalid invoice record in {}: {}", args.input.display(), e)
    })?;
    info!(
        "Loaded record from {} with {} line items",
        args.input.display(),
        record.items.len()
    );

    if config.export.show_warnings {
        for issue in record.validate() {
            eprintln!("{} {}", style("⚠").yellow(), issue);
        }
    }

    if args.stdout {
        println!("{}", csv::format(&record));
        return Ok(());
    }

    let dir = args
        .output_dir
        .or(config.export.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;
    let path = csv::write_to(&dir, &record, csv::export_date(chrono::Utc::now()))?;
    println!("{} Exported to {}", style("✓").green(), path.display());

    Ok(())
}
