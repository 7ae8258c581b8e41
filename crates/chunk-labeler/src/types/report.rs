//! Run outcome reporting

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

/// A chunk dropped because its labeling call failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkFailure {
    /// Zero-based chunk index
    pub chunk_index: usize,
    /// Data rows the chunk covered
    pub rows: Range<usize>,
    /// Error message from the labeling call or count check
    pub reason: String,
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Data rows read from the source table
    pub total_rows: usize,
    /// Chunks attempted
    pub chunks_total: usize,
    /// Chunks whose labels were merged
    pub chunks_succeeded: usize,
    /// Rows in the accumulator at the end of the run
    pub labeled_rows: usize,
    /// Dropped chunks, in order
    pub failures: Vec<ChunkFailure>,
    /// Output files in write order
    pub files_written: Vec<PathBuf>,
}

impl RunReport {
    /// True when no chunk was dropped
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Source rows that never reached an output file
    pub fn dropped_rows(&self) -> usize {
        self.failures.iter().map(|f| f.rows.len()).sum()
    }

    /// The file holding the complete labeled dataset, if any was written
    pub fn final_file(&self) -> Option<&PathBuf> {
        self.files_written.last()
    }
}
