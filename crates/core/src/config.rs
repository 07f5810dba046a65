use crate::error::{Error, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the codegraph system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ingestion pipeline configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Retrieval engine configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Configuration for the ingestion pipeline coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Endpoint the AST source is fetched from
    #[serde(default = "default_ast_endpoint")]
    pub ast_endpoint: String,

    /// Whether the periodic trigger is enabled
    #[serde(default)]
    pub schedule_enabled: bool,

    /// Interval between periodic triggers, in seconds
    #[serde(default = "default_schedule_interval_secs")]
    pub schedule_interval_secs: u64,
}

/// Configuration for the hybrid retrieval engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Whether the embedding pre-filter runs before the LLM pass
    #[serde(default = "default_true")]
    pub prefilter_enabled: bool,

    /// Nearest-neighbor search limit per entity kind
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Minimum similarity score for a candidate to qualify
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,

    /// Global cap on the combined filtered candidate set
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_ast_endpoint() -> String {
    "http://localhost:8080/ast".to_string()
}

fn default_schedule_interval_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_search_limit() -> usize {
    50
}

fn default_score_threshold() -> f32 {
    0.65
}

fn default_max_candidates() -> usize {
    30
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            ast_endpoint: default_ast_endpoint(),
            schedule_enabled: false,
            schedule_interval_secs: default_schedule_interval_secs(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            prefilter_enabled: default_true(),
            search_limit: default_search_limit(),
            score_threshold: default_score_threshold(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl IngestionConfig {
    /// Validates the ingestion section
    pub fn validate(&self) -> Result<()> {
        if self.ast_endpoint.is_empty() {
            return Err(Error::config("ast_endpoint must not be empty".to_string()));
        }

        if self.schedule_interval_secs == 0 {
            return Err(Error::config(
                "schedule_interval_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl RetrievalConfig {
    /// Validates the retrieval section
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(Error::config(format!(
                "Invalid score threshold {}. Must be between 0.0 and 1.0",
                self.score_threshold
            )));
        }

        if self.search_limit == 0 {
            return Err(Error::config(
                "search_limit must be greater than 0".to_string(),
            ));
        }

        if self.max_candidates == 0 {
            return Err(Error::config(
                "max_candidates must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `CODEGRAPH_` and use double
    /// underscores for nested values. For example:
    /// - `CODEGRAPH_RETRIEVAL__MAX_CANDIDATES=50`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with CODEGRAPH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("CODEGRAPH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.ingestion.validate()?;
        self.retrieval.validate()
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
