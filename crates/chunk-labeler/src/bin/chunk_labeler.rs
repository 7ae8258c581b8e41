//! Chunk labeler binary
//!
//! Run with: cargo run -p chunk-labeler -- 2022_test.xlsx

use anyhow::Context;
use chunk_labeler::config::{FlushMode, OutputFormat};
use chunk_labeler::{ChunkedLabelingPipeline, LabelerConfig, OllamaLabeler, RunReport};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Label spreadsheet rows in chunks with a local LLM, checkpointing results
#[derive(Debug, Parser)]
#[command(name = "chunk-labeler", version, about)]
struct Cli {
    /// Source table (.xlsx, .xls, .ods or .csv)
    source: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worksheet to read (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Maximum rows per labeling call
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Successful chunks between intermediate saves
    #[arg(long)]
    flush_every: Option<usize>,

    /// Directory for output files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format: xlsx or csv
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Periodic file contents: cumulative or delta
    #[arg(long)]
    mode: Option<FlushMode>,

    /// Ollama base URL
    #[arg(long)]
    ollama_url: Option<String>,

    /// Ollama model name
    #[arg(long)]
    model: Option<String>,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Layer command line flags over the config file and defaults
    fn into_config(self) -> anyhow::Result<LabelerConfig> {
        let mut config = match &self.config {
            Some(path) => LabelerConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => LabelerConfig::default(),
        };

        if let Some(source) = self.source {
            config.source.path = source;
        }
        if self.sheet.is_some() {
            config.source.sheet = self.sheet;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.pipeline.chunk_size = chunk_size;
        }
        if let Some(flush_every) = self.flush_every {
            config.pipeline.flush_every = flush_every;
        }
        if let Some(dir) = self.output_dir {
            config.output.dir = dir;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(mode) = self.mode {
            config.output.mode = mode;
        }
        if let Some(url) = self.ollama_url {
            config.llm.base_url = url;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if self.quiet {
            config.pipeline.verbose = false;
        }

        Ok(config)
    }
}

async fn run(config: LabelerConfig) -> anyhow::Result<RunReport> {
    let labeler = Arc::new(OllamaLabeler::new(&config.llm).context("creating Ollama client")?);
    let pipeline = ChunkedLabelingPipeline::new(config, labeler.clone())?;

    let config = pipeline.config();
    tracing::info!("Configuration loaded");
    tracing::info!("  - Source: {}", config.source.path.display());
    tracing::info!("  - Chunk size: {}", config.pipeline.chunk_size);
    tracing::info!("  - Flush every: {} chunks", config.pipeline.flush_every);
    tracing::info!("  - Output: {} ({})", config.output.dir.display(), config.output.format);
    tracing::info!("  - LLM model: {}", labeler.model());

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    if labeler.health_check().await? {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Every chunk will fail until it is reachable:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!("  2. Pull model: ollama pull {}", labeler.model());
    }

    let report = pipeline.run().await.context("labeling run aborted")?;
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.quiet {
        "chunk_labeler=warn"
    } else {
        "chunk_labeler=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(report) if report.is_complete() => ExitCode::SUCCESS,
        Ok(report) => {
            for failure in &report.failures {
                tracing::warn!(
                    "Dropped chunk {} (rows {}..{}): {}",
                    failure.chunk_index + 1,
                    failure.rows.start,
                    failure.rows.end,
                    failure.reason
                );
            }
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
