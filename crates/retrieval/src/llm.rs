//! Trait definition for the language-model collaborator

use async_trait::async_trait;
use codegraph_core::error::Result;

/// Single-shot text completion
///
/// Synchronous request/response; this core does not require streaming.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
