//! sheetcheck
//!
//! Validates the title-block metadata and revision tables of architectural
//! drawing sheets before they are delivered to a client. Each PDF is checked
//! independently against the configured reference values and, optionally, a
//! project revision template.
//!
//! Exit status is 1 when any sheet is rejected.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sheet_validator::{
    load_template, DocumentInput, DocumentPipeline, SheetValidator, ValidatorConfig,
};
use shared_pdf::LopdfTextExtractor;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod report;
#[cfg(test)]
mod tests;

use report::BatchReport;

/// Command-line arguments for sheetcheck
#[derive(Parser, Debug)]
#[command(name = "sheetcheck")]
#[command(about = "Validate title-block metadata of architectural drawing sheets")]
struct Args {
    /// PDF sheets to validate, processed in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Validator configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Revision template (TOML or JSON)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Per-document extraction timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Only the first N pages of each document are read
    #[arg(long)]
    max_pages: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Configuration file (or defaults) with command-line overrides applied
    fn load_config(&self) -> anyhow::Result<ValidatorConfig> {
        let mut config = match &self.config {
            Some(path) => ValidatorConfig::from_file(path)?,
            None => ValidatorConfig::default(),
        };
        if let Some(timeout_ms) = self.timeout_ms {
            config.limits.timeout_ms = timeout_ms;
        }
        if let Some(max_pages) = self.max_pages {
            config.limits.max_pages = max_pages;
        }
        Ok(config)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the report
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.load_config()?;
    let template = args.template.as_deref().map(load_template).transpose()?;

    let mut documents = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read sheet: {}", path.display()))?;
        documents.push(DocumentInput::new(display_name(path), bytes));
    }

    info!(
        documents = documents.len(),
        template = template.as_ref().map(|t| t.name.as_str()).unwrap_or("none"),
        timeout_ms = config.limits.timeout_ms,
        max_pages = config.limits.max_pages,
        "Starting sheet validation"
    );

    let extractor = LopdfTextExtractor::with_max_pages(config.limits.max_pages);
    let pipeline = DocumentPipeline::new(extractor, SheetValidator::new(config)?);
    let results = pipeline.process_batch(&documents, template.as_ref()).await;

    let files = documents.into_iter().map(|d| d.name).collect();
    let report = BatchReport::new(files, results, template.as_ref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(if report.has_rejections() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
