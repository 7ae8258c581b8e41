//! Chunked labeling with periodic checkpoints

mod checkpoint;
mod pipeline;

pub use checkpoint::CheckpointWriter;
pub use pipeline::ChunkedLabelingPipeline;
