//! Query-time retrieval engine
//!
//! Wires the registry, embedding provider, similarity search, and language
//! model into the two-stage funnel. `analyze_entities` is the single public
//! operation and never propagates an error: every failure path degrades to
//! an empty extraction result, which callers must read as "nothing found",
//! not proof of absence.

use codegraph_core::config::RetrievalConfig;
use codegraph_core::entities::{ClassEntity, ExtractedEntities, MethodEntity};
use codegraph_core::error::{Error, Result};
use codegraph_embeddings::EmbeddingProvider;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::llm::CompletionModel;
use crate::parser::parse_llm_response;
use crate::prefilter::pre_filter_entities;
use crate::prompts;
use crate::registry::EntityRegistry;
use crate::similarity::SimilaritySearch;

/// Hybrid retrieval engine: embedding pre-filter, then LLM extraction
pub struct RetrievalEngine {
    registry: Arc<dyn EntityRegistry>,
    embeddings: Arc<dyn EmbeddingProvider>,
    similarity: Arc<dyn SimilaritySearch>,
    model: Arc<dyn CompletionModel>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        registry: Arc<dyn EntityRegistry>,
        embeddings: Arc<dyn EmbeddingProvider>,
        similarity: Arc<dyn SimilaritySearch>,
        model: Arc<dyn CompletionModel>,
        config: RetrievalConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            embeddings,
            similarity,
            model,
            config,
        })
    }

    /// Identify the codebase entities most relevant to a free-text query.
    ///
    /// Never returns an error: any failure is absorbed here and surfaces as
    /// an empty [`ExtractedEntities`].
    pub async fn analyze_entities(&self, query: &str) -> ExtractedEntities {
        match self.try_analyze(query).await {
            Ok(extracted) => extracted,
            Err(e) => {
                error!("Entity analysis failed, returning empty result: {e}");
                ExtractedEntities::empty()
            }
        }
    }

    async fn try_analyze(&self, query: &str) -> Result<ExtractedEntities> {
        if query.trim().is_empty() {
            return Err(Error::invalid_input("query must not be blank"));
        }

        let started = Instant::now();

        let classes = self.registry.all_classes().await?;
        let methods = self.registry.all_methods().await?;
        debug!(
            "Loaded {} classes and {} methods from the registry",
            classes.len(),
            methods.len()
        );

        let (candidate_classes, candidate_methods) =
            self.source_candidates(query, classes, methods).await;

        let prompt =
            prompts::entity_extraction_prompt(query, &candidate_classes, &candidate_methods);
        let response = self.model.generate(&prompt).await?;
        let extracted = parse_llm_response(&response);

        info!(
            "Extracted {} entities in {:.0}ms",
            extracted.total_count(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(extracted)
    }

    /// Candidate sourcing: pre-filter when enabled, otherwise the full
    /// population goes straight to the formatting stage.
    async fn source_candidates(
        &self,
        query: &str,
        classes: Vec<ClassEntity>,
        methods: Vec<MethodEntity>,
    ) -> (Vec<ClassEntity>, Vec<MethodEntity>) {
        if !self.config.prefilter_enabled {
            debug!("Pre-filtering disabled, using the full entity population");
            return (classes, methods);
        }

        let result = pre_filter_entities(
            self.embeddings.as_ref(),
            self.similarity.as_ref(),
            &self.config,
            query,
            classes,
            methods,
        )
        .await;
        info!(
            "Pre-filter kept {}/{} entities ({}% reduction, {} unmatched)",
            result.filtered_count,
            result.original_count,
            result.reduction_percentage,
            result.unmatched_count
        );
        (result.classes, result.methods)
    }
}
