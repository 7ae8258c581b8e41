//! Chunked labeling pipeline
//!
//! Loads the source table once, walks it in fixed-size chunks, labels each
//! chunk with a single call to the labeling engine and checkpoints the
//! accumulated results to numbered files. A chunk whose call fails, or
//! returns the wrong number of labels, is dropped and recorded in the run
//! report; table load and file write errors abort the run.

use std::sync::Arc;
use std::time::Instant;

use crate::config::LabelerConfig;
use crate::error::{Error, Result};
use crate::ingestion::{RowChunker, TableParser};
use crate::providers::Labeler;
use crate::types::{Chunk, ChunkFailure, LabeledRow, RunReport};

use super::checkpoint::CheckpointWriter;

/// Progress goes to info when verbose, debug otherwise
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// Per-run mutable state
struct RunState {
    checkpoints: CheckpointWriter,
    /// Labeled rows in source order; never cleared during a run
    accumulator: Vec<LabeledRow>,
    /// Chunks merged so far
    succeeded: usize,
    report: RunReport,
}

/// Pipeline that labels a table chunk by chunk with periodic checkpoints
pub struct ChunkedLabelingPipeline {
    config: LabelerConfig,
    labeler: Arc<dyn Labeler>,
}

impl ChunkedLabelingPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: LabelerConfig, labeler: Arc<dyn Labeler>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, labeler })
    }

    /// Validated configuration the pipeline runs with
    pub fn config(&self) -> &LabelerConfig {
        &self.config
    }

    /// Run the pipeline to completion
    pub async fn run(&self) -> Result<RunReport> {
        let verbose = self.config.pipeline.verbose;
        let source = &self.config.source;
        let start_time = Instant::now();

        let table = TableParser::parse(&source.path, source.sheet.as_deref())?;
        progress!(
            verbose,
            "Source table {} loaded: {} rows",
            source.path.display(),
            table.len()
        );

        let rows = table.working_rows(source.id_column, source.text_column)?;
        drop(table);

        let mut state = RunState {
            checkpoints: CheckpointWriter::new(&self.config.output)?,
            accumulator: Vec::with_capacity(rows.len()),
            succeeded: 0,
            report: RunReport {
                total_rows: rows.len(),
                ..Default::default()
            },
        };

        let chunker = RowChunker::new(rows, self.config.pipeline.chunk_size);
        let chunk_count = chunker.len();
        progress!(
            verbose,
            "Labeling {} rows in {} chunks of up to {} with {}",
            state.report.total_rows,
            chunk_count,
            self.config.pipeline.chunk_size,
            self.labeler.name()
        );

        for chunk in chunker {
            state.report.chunks_total += 1;
            self.process_chunk(chunk, chunk_count, &mut state).await?;
        }

        if !state.accumulator.is_empty() {
            let path = state.checkpoints.flush_final(&state.accumulator)?;
            progress!(verbose, "All chunks processed, saved to {}", path.display());
            state.report.files_written.push(path);
        }

        let mut report = state.report;
        report.chunks_succeeded = state.succeeded;
        report.labeled_rows = state.accumulator.len();

        if report.is_complete() {
            progress!(
                verbose,
                "Run complete: {} rows labeled, {} files written in {:.1}s",
                report.labeled_rows,
                report.files_written.len(),
                start_time.elapsed().as_secs_f64()
            );
        } else {
            tracing::warn!(
                "Run complete with {} dropped chunk(s): {} of {} rows labeled, {} files written",
                report.failures.len(),
                report.labeled_rows,
                report.total_rows,
                report.files_written.len()
            );
        }

        Ok(report)
    }

    /// Label one chunk and merge it, flushing when the cadence says so.
    ///
    /// Only checkpoint write errors escape; labeling failures are recorded.
    async fn process_chunk(
        &self,
        chunk: Chunk,
        chunk_count: usize,
        state: &mut RunState,
    ) -> Result<()> {
        let verbose = self.config.pipeline.verbose;
        let number = chunk.index + 1;
        progress!(verbose, "Processing chunk {}/{}", number, chunk_count);

        let labels = match self.label_chunk(&chunk).await {
            Ok(labels) => labels,
            Err(e) => {
                tracing::warn!("Chunk {} failed, dropping {} rows: {}", number, chunk.len(), e);
                state.report.failures.push(ChunkFailure {
                    chunk_index: chunk.index,
                    rows: chunk.row_range(),
                    reason: e.to_string(),
                });
                return Ok(());
            }
        };

        let is_last = chunk.is_last;
        state.accumulator.extend(chunk.into_labeled(labels));
        state.succeeded += 1;

        if state.succeeded % self.config.pipeline.flush_every == 0 || is_last {
            let path = state.checkpoints.flush_periodic(&state.accumulator)?;
            progress!(
                verbose,
                "Saved {} after {} successful chunks",
                path.display(),
                state.succeeded
            );
            state.report.files_written.push(path);
        }

        Ok(())
    }

    /// Call the labeler and check it returned one label per row
    async fn label_chunk(&self, chunk: &Chunk) -> Result<Vec<String>> {
        let labels = self.labeler.label_many(&chunk.texts()).await?;

        if labels.len() != chunk.len() {
            return Err(Error::LabelCountMismatch {
                expected: chunk.len(),
                actual: labels.len(),
            });
        }

        Ok(labels)
    }
}
