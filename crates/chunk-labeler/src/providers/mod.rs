//! Labeling engine abstractions
//!
//! The pipeline only sees the `Labeler` trait, so the engine can be swapped
//! for a local model, a remote service or a deterministic fake.

pub mod labeler;
pub mod ollama;

pub use labeler::{FnLabeler, Labeler};
pub use ollama::OllamaLabeler;
