//! Trait definition for embedding providers

use async_trait::async_trait;
use codegraph_core::error::Result;

/// Trait for embedding providers
///
/// Implementations may be local models or remote APIs; the retrieval path
/// only needs a single query vector per call.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a list of texts
    ///
    /// Returns one `Option<Vec<f32>>` per input, `None` for texts the model
    /// cannot embed (e.g. exceeding its context window).
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>>;

    /// The size of the vectors produced by this provider
    fn embedding_dimension(&self) -> usize;
}
