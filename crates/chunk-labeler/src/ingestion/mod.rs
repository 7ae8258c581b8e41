//! Source table ingestion and row chunking

mod chunker;
mod parser;

pub use chunker::RowChunker;
pub use parser::{SourceTable, TableFormat, TableParser};
