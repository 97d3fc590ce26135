//! Answer generation via a hosted LLM.

mod gemini;

pub use gemini::GeminiGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text generation from an assembled prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
