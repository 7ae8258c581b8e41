//! Configuration for the labeling pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Main labeling configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    /// Source table configuration
    pub source: SourceConfig,
    /// Chunking and flush cadence
    pub pipeline: PipelineConfig,
    /// Output file configuration
    pub output: OutputConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
}

impl LabelerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Check option ranges before a run starts
    pub fn validate(&self) -> Result<()> {
        if self.source.path.as_os_str().is_empty() {
            return Err(Error::config("source.path is required"));
        }
        if self.pipeline.chunk_size == 0 {
            return Err(Error::config("pipeline.chunk_size must be positive"));
        }
        if self.pipeline.flush_every == 0 {
            return Err(Error::config("pipeline.flush_every must be positive"));
        }
        if self.output.periodic_prefix.is_empty() || self.output.final_prefix.is_empty() {
            return Err(Error::config("output file prefixes must not be empty"));
        }
        Ok(())
    }
}

/// Source table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the input table (.xlsx, .xls, .ods or .csv)
    pub path: PathBuf,
    /// Worksheet to read (default: first sheet)
    pub sheet: Option<String>,
    /// Zero-based column holding the row identifier
    pub id_column: usize,
    /// Zero-based column holding the free text to label
    pub text_column: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            sheet: None,
            id_column: 0,
            text_column: 2,
        }
    }
}

impl SourceConfig {
    /// Minimum number of columns the source table must have
    pub fn required_columns(&self) -> usize {
        self.id_column.max(self.text_column) + 1
    }
}

/// Chunking and flush cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum rows per labeling call
    pub chunk_size: usize,
    /// Successful chunks between intermediate saves
    pub flush_every: usize,
    /// Report progress at info level
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 50,
            flush_every: 10,
            verbose: true,
        }
    }
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for checkpoint files
    pub dir: PathBuf,
    /// File name prefix for periodic flushes
    pub periodic_prefix: String,
    /// File name prefix for the final flush
    pub final_prefix: String,
    /// Output file format
    pub format: OutputFormat,
    /// What each periodic file contains
    pub mode: FlushMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            periodic_prefix: "test".to_string(),
            final_prefix: "test2".to_string(),
            format: OutputFormat::Xlsx,
            mode: FlushMode::Cumulative,
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook with a single sheet
    #[default]
    Xlsx,
    /// Comma-separated values with a header row
    Csv,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(Error::config(format!("unknown output format '{}'", other))),
        }
    }
}

/// Contents of periodic checkpoint files
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlushMode {
    /// Every periodic file holds all rows labeled so far
    #[default]
    Cumulative,
    /// Every periodic file holds only rows labeled since the previous one
    Delta,
}

impl FromStr for FlushMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cumulative" => Ok(Self::Cumulative),
            "delta" => Ok(Self::Delta),
            other => Err(Error::config(format!("unknown flush mode '{}'", other))),
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Labeling instructions prepended to every batch
    pub instructions: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:7b".to_string(),
            temperature: 0.0,   // Labels should be deterministic
            timeout_secs: 300,  // A 50-row batch can take minutes on CPU
            instructions: "Assign one short category label to each text.".to_string(),
        }
    }
}
