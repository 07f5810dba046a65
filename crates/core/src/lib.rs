//! Core types for the codegraph entity retrieval system
//!
//! This crate provides the foundational abstractions shared by the
//! ingestion and retrieval crates:
//!
//! - **Entities**: registry records for classes and methods, plus the
//!   transient candidate and result types produced during retrieval
//! - **Configuration**: system configuration with file and environment
//!   loading
//! - **Error handling**: unified error type
//!

pub mod config;
pub mod entities;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, IngestionConfig, RetrievalConfig};
pub use entities::{
    ClassEntity, EntityKind, ExtractedEntities, MethodEntity, PreFilteringResult, SimilarEntity,
};
pub use error::{Error, Result, ResultExt};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::entities::{ClassEntity, EntityKind, ExtractedEntities, MethodEntity};
    pub use crate::error::{Result, ResultExt};
}
