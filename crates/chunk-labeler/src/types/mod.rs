//! Core types for the labeling pipeline

pub mod report;
pub mod row;

pub use report::{ChunkFailure, RunReport};
pub use row::{Chunk, LabeledRow, WorkingRow};
