//! Single-flight coordinator for the ingestion pipeline
//!
//! `trigger()` acquires the run guard synchronously, spawns the pipeline on
//! the tokio runtime, and returns immediately. Stage failures never reach the
//! trigger caller; they are logged and the run simply ends. The guard's `Drop`
//! releases the running flag on every exit path, including panics.

use crate::snapshot::AstSnapshot;
use crate::stages::{AstSource, GraphBuilder, PipelineStage, SemanticEnricher, Vectorizer};
use chrono::{DateTime, Utc};
use codegraph_core::config::IngestionConfig;
use codegraph_core::error::Result;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

/// Response to a manual or scheduled trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TriggerOutcome {
    /// The run was accepted and is executing in the background
    Accepted {
        run_id: Uuid,
        triggered_at: DateTime<Utc>,
    },
    /// A run is already active; no work was started
    AlreadyRunning,
}

/// Point-in-time view of the coordinator, side-effect free
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub running: bool,
    pub current_stage: Option<PipelineStage>,
    /// Completion time of the last successful run; `None` means never
    pub last_completed: Option<DateTime<Utc>>,
    pub schedule_enabled: bool,
}

/// The four stage collaborators, bundled for wiring
#[derive(Clone)]
pub struct PipelineStages {
    pub ast_source: Arc<dyn AstSource>,
    pub graph_builder: Arc<dyn GraphBuilder>,
    pub enricher: Arc<dyn SemanticEnricher>,
    pub vectorizer: Arc<dyn Vectorizer>,
}

/// Shared run state, mutated only while the guard is held
struct RunState {
    running: AtomicBool,
    current_stage: Mutex<Option<PipelineStage>>,
    last_completed: Mutex<Option<DateTime<Utc>>>,
}

impl RunState {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            running: AtomicBool::new(false),
            current_stage: Mutex::new(None),
            last_completed: Mutex::new(None),
        })
    }

    /// Acquire the run mutex. Returns `None` if a run is already active.
    fn try_acquire(self: &Arc<Self>) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(RunGuard {
            state: Arc::clone(self),
        })
    }
}

/// Lock poisoning only happens if a holder panicked mid-update; the state is
/// a plain Option either way, so recover the inner value.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// RAII acquisition of the single-flight run mutex
///
/// Dropping the guard clears the running flag and the current stage, which
/// gives the guaranteed release on success, quiet abort, stage failure, and
/// panic alike.
struct RunGuard {
    state: Arc<RunState>,
}

impl RunGuard {
    fn set_stage(&self, stage: PipelineStage) {
        *lock_unpoisoned(&self.state.current_stage) = Some(stage);
    }

    fn mark_completed(&self, at: DateTime<Utc>) {
        *lock_unpoisoned(&self.state.last_completed) = Some(at);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *lock_unpoisoned(&self.state.current_stage) = None;
        self.state.running.store(false, Ordering::Release);
    }
}

/// Coordinates the four-stage ingestion pipeline with single-flight execution
pub struct PipelineCoordinator {
    stages: PipelineStages,
    config: IngestionConfig,
    state: Arc<RunState>,
}

impl PipelineCoordinator {
    pub fn new(stages: PipelineStages, config: IngestionConfig) -> Self {
        Self {
            stages,
            config,
            state: RunState::new(),
        }
    }

    /// Start a pipeline run unless one is already active.
    ///
    /// Returns before any stage has executed; the run's outcome is only
    /// observable through [`status`](Self::status) or logs. Both the manual
    /// surface and the periodic scheduler go through this entry point.
    pub fn trigger(&self) -> TriggerOutcome {
        let Some(guard) = self.state.try_acquire() else {
            info!("Ingestion trigger rejected: a run is already active");
            return TriggerOutcome::AlreadyRunning;
        };

        let run_id = Uuid::new_v4();
        let triggered_at = Utc::now();
        let stages = self.stages.clone();
        let endpoint = self.config.ast_endpoint.clone();

        tokio::spawn(async move {
            run_pipeline(run_id, guard, stages, endpoint).await;
        });

        info!("Ingestion run {run_id} accepted");
        TriggerOutcome::Accepted {
            run_id,
            triggered_at,
        }
    }

    /// Interval used by the periodic scheduler
    pub fn schedule_interval_secs(&self) -> u64 {
        self.config.schedule_interval_secs
    }

    /// Report run state without side effects
    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            running: self.state.running.load(Ordering::Acquire),
            current_stage: *lock_unpoisoned(&self.state.current_stage),
            last_completed: *lock_unpoisoned(&self.state.last_completed),
            schedule_enabled: self.config.schedule_enabled,
        }
    }
}

enum RunOutcome {
    Completed,
    NothingToIngest,
}

/// Pipeline body, executed off the trigger caller's thread of control.
///
/// Owns the guard for the whole run; no separate double-check of the running
/// flag is needed because acquisition already happened in `trigger()`.
async fn run_pipeline(run_id: Uuid, guard: RunGuard, stages: PipelineStages, endpoint: String) {
    let started = Instant::now();
    info!("Ingestion run {run_id} started");

    match execute_stages(&guard, &stages, &endpoint).await {
        Ok(RunOutcome::Completed) => {
            guard.mark_completed(Utc::now());
            info!(
                "Ingestion run {run_id} completed in {:.1}s",
                started.elapsed().as_secs_f64()
            );
        }
        Ok(RunOutcome::NothingToIngest) => {
            info!("Ingestion run {run_id}: AST snapshot empty, nothing to ingest");
        }
        Err(e) => {
            error!("Ingestion run {run_id} failed: {e}");
        }
    }
    // guard drops here, releasing the run mutex
}

async fn execute_stages(
    guard: &RunGuard,
    stages: &PipelineStages,
    endpoint: &str,
) -> Result<RunOutcome> {
    guard.set_stage(PipelineStage::FetchAst);
    let snapshot: AstSnapshot = match stages.ast_source.fetch_ast(endpoint).await? {
        Some(snapshot) if !snapshot.is_empty() => snapshot,
        _ => return Ok(RunOutcome::NothingToIngest),
    };
    info!(
        "Fetched AST snapshot: {} classes, {} methods, {} endpoints",
        snapshot.classes.len(),
        snapshot.methods.len(),
        snapshot.endpoints.len()
    );

    guard.set_stage(PipelineStage::BuildGraph);
    stages.graph_builder.build_graph(&snapshot).await?;

    guard.set_stage(PipelineStage::EnrichMethods);
    stages.enricher.enrich_methods().await?;

    guard.set_stage(PipelineStage::Vectorize);
    stages.vectorizer.vectorize_enriched_methods().await?;

    Ok(RunOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::AstClass;
    use async_trait::async_trait;
    use codegraph_core::Error;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn test_snapshot() -> AstSnapshot {
        AstSnapshot {
            classes: vec![AstClass {
                name: "OrderService".to_string(),
                package: "com.shop.orders".to_string(),
                annotations: vec![],
            }],
            ..Default::default()
        }
    }

    /// AST source that blocks until released, for holding a run open
    struct BlockingAstSource {
        release: Arc<Notify>,
        snapshot: Option<AstSnapshot>,
    }

    #[async_trait]
    impl AstSource for BlockingAstSource {
        async fn fetch_ast(&self, _endpoint: &str) -> Result<Option<AstSnapshot>> {
            self.release.notified().await;
            Ok(self.snapshot.clone())
        }
    }

    struct ImmediateAstSource {
        snapshot: Option<AstSnapshot>,
    }

    #[async_trait]
    impl AstSource for ImmediateAstSource {
        async fn fetch_ast(&self, _endpoint: &str) -> Result<Option<AstSnapshot>> {
            Ok(self.snapshot.clone())
        }
    }

    #[derive(Default)]
    struct CountingGraphBuilder {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl GraphBuilder for CountingGraphBuilder {
        async fn build_graph(&self, _snapshot: &AstSnapshot) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::graph("connection refused"));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingEnricher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SemanticEnricher for CountingEnricher {
        async fn enrich_methods(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingVectorizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Vectorizer for CountingVectorizer {
        async fn vectorize_enriched_methods(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct TestStages {
        graph_builder: Arc<CountingGraphBuilder>,
        enricher: Arc<CountingEnricher>,
        vectorizer: Arc<CountingVectorizer>,
    }

    fn build_stages(ast_source: Arc<dyn AstSource>, fail_graph: bool) -> (PipelineStages, TestStages) {
        let graph_builder = Arc::new(CountingGraphBuilder {
            calls: AtomicUsize::new(0),
            fail: fail_graph,
        });
        let enricher = Arc::new(CountingEnricher::default());
        let vectorizer = Arc::new(CountingVectorizer::default());
        let stages = PipelineStages {
            ast_source,
            graph_builder: graph_builder.clone(),
            enricher: enricher.clone(),
            vectorizer: vectorizer.clone(),
        };
        (
            stages,
            TestStages {
                graph_builder,
                enricher,
                vectorizer,
            },
        )
    }

    /// Poll status until the run finishes, or panic after ~2s
    async fn wait_until_idle(coordinator: &PipelineCoordinator) {
        for _ in 0..200 {
            if !coordinator.status().running {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("pipeline did not finish in time");
    }

    #[tokio::test]
    async fn test_trigger_runs_all_stages_in_order() {
        let ast_source = Arc::new(ImmediateAstSource {
            snapshot: Some(test_snapshot()),
        });
        let (stages, probes) = build_stages(ast_source, false);
        let coordinator = PipelineCoordinator::new(stages, IngestionConfig::default());

        let outcome = coordinator.trigger();
        assert!(matches!(outcome, TriggerOutcome::Accepted { .. }));

        wait_until_idle(&coordinator).await;
        assert_eq!(probes.graph_builder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(probes.enricher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(probes.vectorizer.calls.load(Ordering::SeqCst), 1);

        let status = coordinator.status();
        assert!(status.last_completed.is_some());
        assert!(status.current_stage.is_none());
    }

    #[tokio::test]
    async fn test_second_trigger_rejected_while_running() {
        let release = Arc::new(Notify::new());
        let ast_source = Arc::new(BlockingAstSource {
            release: release.clone(),
            snapshot: Some(test_snapshot()),
        });
        let (stages, probes) = build_stages(ast_source, false);
        let coordinator = PipelineCoordinator::new(stages, IngestionConfig::default());

        let first = coordinator.trigger();
        assert!(matches!(first, TriggerOutcome::Accepted { .. }));
        assert!(coordinator.status().running);

        // Second trigger while the first is blocked in fetch_ast
        let second = coordinator.trigger();
        assert_eq!(second, TriggerOutcome::AlreadyRunning);

        release.notify_one();
        wait_until_idle(&coordinator).await;

        // Exactly one pipeline executed
        assert_eq!(probes.graph_builder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutex_released_after_stage_failure() {
        let ast_source = Arc::new(ImmediateAstSource {
            snapshot: Some(test_snapshot()),
        });
        let (stages, probes) = build_stages(ast_source, true);
        let coordinator = PipelineCoordinator::new(stages, IngestionConfig::default());

        assert!(matches!(
            coordinator.trigger(),
            TriggerOutcome::Accepted { .. }
        ));
        wait_until_idle(&coordinator).await;

        // Failure aborted the remaining stages and left no completion record
        assert_eq!(probes.enricher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(probes.vectorizer.calls.load(Ordering::SeqCst), 0);
        assert!(coordinator.status().last_completed.is_none());

        // The mutex was released despite the failure: a fresh trigger succeeds
        assert!(matches!(
            coordinator.trigger(),
            TriggerOutcome::Accepted { .. }
        ));
        wait_until_idle(&coordinator).await;
        assert_eq!(probes.graph_builder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_snapshot_aborts_quietly() {
        let ast_source = Arc::new(ImmediateAstSource {
            snapshot: Some(AstSnapshot::default()),
        });
        let (stages, probes) = build_stages(ast_source, false);
        let coordinator = PipelineCoordinator::new(stages, IngestionConfig::default());

        coordinator.trigger();
        wait_until_idle(&coordinator).await;

        // No later stage ran, and the abort is not recorded as a completion
        assert_eq!(probes.graph_builder.calls.load(Ordering::SeqCst), 0);
        assert!(coordinator.status().last_completed.is_none());
    }

    #[tokio::test]
    async fn test_null_snapshot_aborts_quietly() {
        let ast_source = Arc::new(ImmediateAstSource { snapshot: None });
        let (stages, probes) = build_stages(ast_source, false);
        let coordinator = PipelineCoordinator::new(stages, IngestionConfig::default());

        coordinator.trigger();
        wait_until_idle(&coordinator).await;
        assert_eq!(probes.graph_builder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_reports_schedule_flag() {
        let ast_source = Arc::new(ImmediateAstSource { snapshot: None });
        let (stages, _) = build_stages(ast_source, false);
        let config = IngestionConfig {
            schedule_enabled: true,
            ..Default::default()
        };
        let coordinator = PipelineCoordinator::new(stages, config);

        let status = coordinator.status();
        assert!(status.schedule_enabled);
        assert!(!status.running);
        assert!(status.last_completed.is_none());
    }
}
