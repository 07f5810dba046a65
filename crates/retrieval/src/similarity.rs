//! Trait definition for nearest-neighbor similarity search

use async_trait::async_trait;
use codegraph_core::entities::{EntityKind, SimilarEntity};
use codegraph_core::error::Result;

/// Nearest-neighbor search over one entity population
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Return up to `limit` candidates for `query_vector` within the given
    /// kind's index, ordered by descending score, every score >= `threshold`.
    ///
    /// Implementations must scope any index/storage session to this call and
    /// release it whether the search succeeds or fails.
    async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
        threshold: f32,
        kind: EntityKind,
    ) -> Result<Vec<SimilarEntity>>;
}
