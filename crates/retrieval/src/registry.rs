//! Read contract for the in-memory entity registry
//!
//! The registry's population is refreshed out-of-band by the ingestion side;
//! retrieval only ever reads point-in-time snapshots of it.

use async_trait::async_trait;
use codegraph_core::entities::{ClassEntity, MethodEntity};
use codegraph_core::error::Result;

/// Read-only view of the current entity population
///
/// No ordering is guaranteed for either snapshot. Implementations are read
/// concurrently by in-flight queries and must not block on ingestion.
#[async_trait]
pub trait EntityRegistry: Send + Sync {
    async fn all_classes(&self) -> Result<Vec<ClassEntity>>;
    async fn all_methods(&self) -> Result<Vec<MethodEntity>>;
}

/// Fixed in-memory registry, used in tests and for embedders that manage
/// the population themselves
pub struct StaticRegistry {
    classes: Vec<ClassEntity>,
    methods: Vec<MethodEntity>,
}

impl StaticRegistry {
    pub fn new(classes: Vec<ClassEntity>, methods: Vec<MethodEntity>) -> Self {
        Self { classes, methods }
    }
}

#[async_trait]
impl EntityRegistry for StaticRegistry {
    async fn all_classes(&self) -> Result<Vec<ClassEntity>> {
        Ok(self.classes.clone())
    }

    async fn all_methods(&self) -> Result<Vec<MethodEntity>> {
        Ok(self.methods.clone())
    }
}
