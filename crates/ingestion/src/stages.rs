//! Collaborator traits for the four ingestion stages
//!
//! Each stage fails independently; the coordinator decides what a failure
//! means for the run as a whole.

use crate::snapshot::AstSnapshot;
use async_trait::async_trait;
use codegraph_core::error::Result;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The four stages, in strict execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStage {
    FetchAst,
    BuildGraph,
    EnrichMethods,
    Vectorize,
}

/// Produces the structural snapshot the pipeline ingests
#[async_trait]
pub trait AstSource: Send + Sync {
    /// Fetch a snapshot from the configured endpoint.
    ///
    /// `Ok(None)` is a valid outcome meaning the source had nothing to offer;
    /// it is not an error.
    async fn fetch_ast(&self, endpoint: &str) -> Result<Option<AstSnapshot>>;
}

/// Persists the snapshot into graph storage
#[async_trait]
pub trait GraphBuilder: Send + Sync {
    /// Idempotent upsert of the snapshot into the persisted graph.
    ///
    /// This is expected to be the slowest and most failure-prone stage.
    async fn build_graph(&self, snapshot: &AstSnapshot) -> Result<()>;
}

/// Annotates already-persisted methods with semantic descriptions
#[async_trait]
pub trait SemanticEnricher: Send + Sync {
    async fn enrich_methods(&self) -> Result<()>;
}

/// Embeds and indexes already-enriched methods
#[async_trait]
pub trait Vectorizer: Send + Sync {
    async fn vectorize_enriched_methods(&self) -> Result<()>;
}
