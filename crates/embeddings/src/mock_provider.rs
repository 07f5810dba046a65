//! Mock embedding provider for testing

use crate::provider::EmbeddingProvider;
use async_trait::async_trait;
use codegraph_core::error::Result;

/// Mock embedding provider that returns deterministic embeddings
///
/// Each vector is derived from the text's bytes so distinct inputs produce
/// distinct (but stable) vectors.
pub struct MockEmbeddingProvider {
    embedding_dim: usize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the specified embedding dimension
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>> {
        Ok(texts
            .into_iter()
            .map(|text| {
                let seed = text.bytes().fold(0u32, |acc, b| {
                    acc.wrapping_mul(31).wrapping_add(u32::from(b))
                });
                Some(
                    (0..self.embedding_dim)
                        .map(|i| ((seed.wrapping_add(i as u32) % 1000) as f32) / 1000.0)
                        .collect(),
                )
            })
            .collect())
    }

    fn embedding_dimension(&self) -> usize {
        self.embedding_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::new(8);
        let a = provider.embed(vec!["order processing".to_string()]).await.unwrap();
        let b = provider.embed(vec!["order processing".to_string()]).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].as_ref().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_mock_embeddings_differ_by_text() {
        let provider = MockEmbeddingProvider::new(8);
        let vecs = provider
            .embed(vec!["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap();
        assert_ne!(vecs[0], vecs[1]);
    }
}
