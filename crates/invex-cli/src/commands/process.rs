//! Process command - extract data from a single invoice file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invex_core::export::csv;
use invex_core::{GeminiExtractor, InvoiceRecord, Status, UploadedFile, Workflow, WorkflowState};

use super::config;
use crate::view;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Write the spreadsheet CSV export after a successful extraction
    #[arg(short, long)]
    export: bool,

    /// Directory for the CSV export (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model to use instead of the configured one
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Result table
    Table,
    /// Invoice record as JSON (can be fed to `invex export`)
    Json,
    /// Spreadsheet CSV payload
    Csv,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = config::load(config_path)?;
    config::resolve_api_key(&mut config);
    if let Some(model) = &args.model {
        config.extraction.model = model.clone();
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let file = UploadedFile::from_path(&args.input)?;
    info!("Processing file: {}", args.input.display());

    let extractor = GeminiExtractor::new(config.extraction.clone())?;
    let mut workflow = Workflow::new(extractor);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    // The spinner follows the workflow's status until the attempt settles
    let mut status = workflow.subscribe();
    let spinner = pb.clone();
    let label = format!("{} ({} bytes)", file.name, file.size());
    let watcher = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = *status.borrow_and_update();
            if current == Status::Processing {
                spinner.set_message(format!("Analyzing {}...", label));
            } else {
                spinner.finish_and_clear();
                break;
            }
        }
    });

    workflow.select_file(file).await?;
    watcher.await?;
    pb.finish_and_clear();

    if let Some(preview) = workflow.preview() {
        info!("Preview: {}", preview.describe());
    }

    let record = match workflow.state() {
        WorkflowState::Success(record) => record,
        WorkflowState::Error(message) => anyhow::bail!("{}", message),
        other => anyhow::bail!("Unexpected workflow state: {:?}", other.status()),
    };

    print_record(record, args.format)?;

    if config.export.show_warnings {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Consistency warnings:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.export {
        let dir = args
            .output_dir
            .clone()
            .or_else(|| config.export.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)?;
        let path = csv::write_to(&dir, record, csv::export_date(chrono::Utc::now()))?;
        eprintln!("{} Exported to {}", style("✓").green(), path.display());
    }

    workflow.reset();
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print!("{}", view::render_record(record)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => println!("{}", csv::format(record)),
    }
    Ok(())
}
