//! Labeling engine trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for batch text labeling
///
/// Implementations:
/// - `OllamaLabeler`: Local Ollama server
/// - `FnLabeler`: Any closure, e.g. a deterministic fake in tests
#[async_trait]
pub trait Labeler: Send + Sync {
    /// Label every text, returning one label per input in the same order.
    ///
    /// The pipeline treats any error, or a result of the wrong length, as a
    /// failure of the whole batch.
    async fn label_many(&self, texts: &[String]) -> Result<Vec<String>>;

    /// Get labeler name for logging
    fn name(&self) -> &str;
}

/// Labeler backed by a synchronous closure
pub struct FnLabeler<F> {
    name: String,
    func: F,
}

impl<F> FnLabeler<F>
where
    F: Fn(&[String]) -> Result<Vec<String>> + Send + Sync,
{
    /// Wrap a closure as a labeler
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Labeler for FnLabeler<F>
where
    F: Fn(&[String]) -> Result<Vec<String>> + Send + Sync,
{
    async fn label_many(&self, texts: &[String]) -> Result<Vec<String>> {
        (self.func)(texts)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
