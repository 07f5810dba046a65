//! Embedding generation for query and entity text
//!
//! The retrieval engine only consumes the [`EmbeddingProvider`] trait; the
//! actual model (local or API-backed) is supplied by the embedder of this
//! crate. A deterministic mock is provided for tests.

mod mock_provider;
pub mod provider;

pub use mock_provider::MockEmbeddingProvider;
pub use provider::EmbeddingProvider;
