//! Ingestion pipeline for the codegraph system
//!
//! Runs the four-stage ingestion sequence (fetch AST, build graph, enrich,
//! vectorize) to completion at most once concurrently. The coordinator is
//! fire-and-forget: `trigger()` returns before any stage has run, and
//! completion is only observable through `status()` or logs.

pub mod coordinator;
pub mod scheduler;
pub mod snapshot;
pub mod stages;

pub use coordinator::{PipelineCoordinator, PipelineStages, PipelineStatus, TriggerOutcome};
pub use scheduler::{start_scheduler, SchedulerHandle};
pub use snapshot::{AstClass, AstEndpoint, AstMethod, AstSnapshot};
pub use stages::{AstSource, GraphBuilder, PipelineStage, SemanticEnricher, Vectorizer};
