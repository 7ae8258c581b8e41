//! Checkpoint file naming, numbering and flushing

use std::path::{Path, PathBuf};

use crate::config::{FlushMode, OutputConfig, OutputFormat};
use crate::error::Result;
use crate::storage;
use crate::types::LabeledRow;

/// Writes the accumulator to numbered output files.
///
/// One counter, starting at 1, numbers both periodic and final files in the
/// order they are written.
pub struct CheckpointWriter {
    dir: PathBuf,
    periodic_prefix: String,
    final_prefix: String,
    format: OutputFormat,
    mode: FlushMode,
    /// Number for the next file written
    file_counter: u32,
    /// Accumulator length at the last periodic flush
    flushed_rows: usize,
}

impl CheckpointWriter {
    /// Create a writer, making the output directory if needed
    pub fn new(config: &OutputConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.dir)?;

        Ok(Self {
            dir: config.dir.clone(),
            periodic_prefix: config.periodic_prefix.clone(),
            final_prefix: config.final_prefix.clone(),
            format: config.format,
            mode: config.mode,
            file_counter: 1,
            flushed_rows: 0,
        })
    }

    /// Number the next file will carry
    pub fn next_file_number(&self) -> u32 {
        self.file_counter
    }

    /// Path of the `n`th file with the given prefix
    pub fn file_path(&self, prefix: &str, n: u32) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", prefix, n, self.format.extension()))
    }

    /// Write an intermediate checkpoint.
    ///
    /// In cumulative mode the file holds every row labeled so far; in delta
    /// mode only rows appended since the previous periodic flush.
    pub fn flush_periodic(&mut self, accumulated: &[LabeledRow]) -> Result<PathBuf> {
        let rows = match self.mode {
            FlushMode::Cumulative => accumulated,
            FlushMode::Delta => &accumulated[self.flushed_rows.min(accumulated.len())..],
        };

        let path = self.file_path(&self.periodic_prefix, self.file_counter);
        self.write(&path, rows)?;
        self.flushed_rows = accumulated.len();
        Ok(path)
    }

    /// Write the complete labeled dataset under the final prefix
    pub fn flush_final(&mut self, accumulated: &[LabeledRow]) -> Result<PathBuf> {
        let path = self.file_path(&self.final_prefix, self.file_counter);
        self.write(&path, accumulated)?;
        Ok(path)
    }

    fn write(&mut self, path: &Path, rows: &[LabeledRow]) -> Result<()> {
        storage::write_labeled(path, self.format, rows)?;
        self.file_counter += 1;
        tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}
