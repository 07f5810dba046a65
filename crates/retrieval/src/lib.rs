//! Hybrid retrieval engine for the codegraph system
//!
//! Answers a free-text query with the classes and methods most relevant to
//! it, in two stages: an embedding-similarity pre-filter narrows the full
//! entity population to a small candidate set, then a language-model pass
//! extracts and ranks the final entities. Both stages degrade rather than
//! fail: a broken similarity index falls back to the full population, and
//! any other failure surfaces as an empty extraction result.

pub mod engine;
pub mod llm;
pub mod parser;
pub mod prefilter;
mod prompts;
pub mod registry;
pub mod similarity;

pub use engine::RetrievalEngine;
pub use llm::CompletionModel;
pub use parser::parse_llm_response;
pub use prefilter::{pre_filter_entities, rank_and_cap};
pub use registry::{EntityRegistry, StaticRegistry};
pub use similarity::SimilaritySearch;
