//! Structural snapshot produced by the AST source

use serde::{Deserialize, Serialize};

/// Point-in-time structural snapshot of the analyzed codebase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstSnapshot {
    #[serde(default)]
    pub classes: Vec<AstClass>,

    #[serde(default)]
    pub methods: Vec<AstMethod>,

    #[serde(default)]
    pub endpoints: Vec<AstEndpoint>,
}

impl AstSnapshot {
    /// A snapshot with no classes and no methods is treated as "nothing to
    /// ingest"; endpoint descriptors alone do not make a snapshot worth a run.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.methods.is_empty()
    }
}

/// Class descriptor as delivered by the AST source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstClass {
    pub name: String,
    pub package: String,
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// Method descriptor as delivered by the AST source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstMethod {
    pub name: String,
    pub signature: String,
    pub class_name: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// API endpoint descriptor as delivered by the AST source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstEndpoint {
    pub path: String,
    pub http_method: String,
    pub handler: String,
}
