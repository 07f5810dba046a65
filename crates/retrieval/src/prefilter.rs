//! Embedding-similarity pre-filter
//!
//! Narrows the full class/method population to a small, globally ranked
//! candidate set before the language-model pass. On any failure the filter
//! degrades to the full population; a query must never hard-fail just
//! because the similarity index is unavailable.

use codegraph_core::config::RetrievalConfig;
use codegraph_core::entities::{
    ClassEntity, EntityKind, MethodEntity, PreFilteringResult, SimilarEntity,
};
use codegraph_core::error::{Error, Result};
use codegraph_embeddings::EmbeddingProvider;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::similarity::SimilaritySearch;

/// Sort candidates by descending score and truncate to `cap`.
///
/// Pure ranking over one combined list: a high-scoring method can take a
/// slot from a low-scoring class. Ties keep their incoming order (stable
/// sort).
pub fn rank_and_cap(mut candidates: Vec<SimilarEntity>, cap: usize) -> Vec<SimilarEntity> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(cap);
    candidates
}

/// Candidates mapped back to full registry entities
pub struct ResolvedCandidates {
    pub classes: Vec<ClassEntity>,
    pub methods: Vec<MethodEntity>,
    /// Candidates with no registry entity of the same name (stale or renamed)
    pub unmatched: usize,
}

/// Map candidates to full entities by exact name.
///
/// Lookup-or-skip: a candidate whose name is absent from the population is
/// dropped without logging; the drop count is surfaced for observability.
/// If the population carries duplicate names, the first entry wins.
pub fn resolve_candidates(
    class_hits: &[SimilarEntity],
    method_hits: &[SimilarEntity],
    classes: &[ClassEntity],
    methods: &[MethodEntity],
) -> ResolvedCandidates {
    let class_index = index_by_name(classes, |c| c.name.as_str());
    let method_index = index_by_name(methods, |m| m.name.as_str());

    let mut unmatched = 0;

    let resolved_classes = class_hits
        .iter()
        .filter_map(|hit| match class_index.get(hit.name.as_str()) {
            Some(entity) => Some((*entity).clone()),
            None => {
                unmatched += 1;
                None
            }
        })
        .collect();

    let resolved_methods = method_hits
        .iter()
        .filter_map(|hit| match method_index.get(hit.name.as_str()) {
            Some(entity) => Some((*entity).clone()),
            None => {
                unmatched += 1;
                None
            }
        })
        .collect();

    ResolvedCandidates {
        classes: resolved_classes,
        methods: resolved_methods,
        unmatched,
    }
}

fn index_by_name<'a, T, F>(items: &'a [T], name: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<&str, &T> = HashMap::with_capacity(items.len());
    for item in items {
        // First entry wins on duplicate names
        index.entry(name(item)).or_insert(item);
    }
    index
}

/// Run the pre-filter, falling back to the full population on any failure.
pub async fn pre_filter_entities(
    embeddings: &dyn EmbeddingProvider,
    search: &dyn SimilaritySearch,
    config: &RetrievalConfig,
    query: &str,
    classes: Vec<ClassEntity>,
    methods: Vec<MethodEntity>,
) -> PreFilteringResult {
    match try_pre_filter(embeddings, search, config, query, &classes, &methods).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Pre-filter degraded to full population: {e}");
            PreFilteringResult::passthrough(classes, methods)
        }
    }
}

async fn try_pre_filter(
    embeddings: &dyn EmbeddingProvider,
    search: &dyn SimilaritySearch,
    config: &RetrievalConfig,
    query: &str,
    classes: &[ClassEntity],
    methods: &[MethodEntity],
) -> Result<PreFilteringResult> {
    let original_count = classes.len() + methods.len();

    let vectors = embeddings.embed(vec![query.to_string()]).await?;
    let query_vector = vectors
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| Error::embedding("provider returned no vector for query"))?;

    let class_hits = search
        .search(
            &query_vector,
            config.search_limit,
            config.score_threshold,
            EntityKind::Class,
        )
        .await?;
    let method_hits = search
        .search(
            &query_vector,
            config.search_limit,
            config.score_threshold,
            EntityKind::Method,
        )
        .await?;
    debug!(
        "Similarity search returned {} class and {} method candidates",
        class_hits.len(),
        method_hits.len()
    );

    let resolved = resolve_candidates(&class_hits, &method_hits, classes, methods);

    // The per-kind search limits can together exceed the global cap. When the
    // mapped count does, re-rank the raw candidates of both kinds as one list,
    // cap, partition by kind, and map again: the cap must be enforced on a
    // globally ranked set, not per kind.
    let resolved = if resolved.classes.len() + resolved.methods.len() > config.max_candidates {
        let mut merged = class_hits;
        merged.extend(method_hits);
        let capped = rank_and_cap(merged, config.max_candidates);
        let (capped_classes, capped_methods): (Vec<_>, Vec<_>) = capped
            .into_iter()
            .partition(|candidate| candidate.kind == EntityKind::Class);
        resolve_candidates(&capped_classes, &capped_methods, classes, methods)
    } else {
        resolved
    };

    Ok(PreFilteringResult::filtered(
        resolved.classes,
        resolved.methods,
        original_count,
        resolved.unmatched,
    ))
}
