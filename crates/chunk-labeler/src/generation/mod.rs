//! Label generation with an LLM

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;
pub use prompt::LabelPrompt;
