//! Ollama-backed labeler
//!
//! Wraps `OllamaClient` and `LabelPrompt` to implement the `Labeler` trait.

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::{LabelPrompt, OllamaClient};

use super::labeler::Labeler;

/// Ollama labeler sending one prompt per batch
pub struct OllamaLabeler {
    client: OllamaClient,
    instructions: String,
}

impl OllamaLabeler {
    /// Create a new Ollama labeler
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(config)?,
            instructions: config.instructions.clone(),
        })
    }

    /// Check if the Ollama server is reachable
    pub async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    /// Get the model being used
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl Labeler for OllamaLabeler {
    async fn label_many(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = LabelPrompt::build(&self.instructions, texts);
        let reply = self.client.generate_json(&prompt).await?;
        LabelPrompt::parse_labels(&reply)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
