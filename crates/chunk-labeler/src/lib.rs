//! chunk-labeler: batch labeling of spreadsheet rows with periodic checkpoints
//!
//! This crate reads a source table, sends its free-text column to a labeling
//! engine in fixed-size chunks, and accumulates the labeled rows into numbered
//! output files. Chunks whose labeling call fails are skipped and reported;
//! the rest of the table is still processed.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod storage;
pub mod types;

pub use config::LabelerConfig;
pub use error::{Error, Result};
pub use processing::ChunkedLabelingPipeline;
pub use providers::{FnLabeler, Labeler, OllamaLabeler};
pub use types::{Chunk, ChunkFailure, LabeledRow, RunReport, WorkingRow};
