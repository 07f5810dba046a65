use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Kind tag distinguishing the two entity populations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Class,
    Method,
}

/// A class node from the entity registry
///
/// Uniqueness of `name` is assumed within the class population. Registry
/// records are read-only from the retrieval side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntity {
    /// Simple class name, unique within the registry
    pub name: String,

    /// Package the class belongs to
    pub package: String,

    /// Semantic description produced during enrichment, if any
    pub description: Option<String>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            description: None,
        }
    }
}

/// A method node from the entity registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntity {
    /// Simple method name, unique within the registry
    pub name: String,

    /// Full signature (parameters and return type)
    pub signature: String,

    /// Name of the owning class
    pub class_name: String,

    /// Package of the owning class
    pub package: String,

    /// Semantic description produced during enrichment, if any
    pub description: Option<String>,
}

impl MethodEntity {
    pub fn new(
        name: impl Into<String>,
        signature: impl Into<String>,
        class_name: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            class_name: class_name.into(),
            package: package.into(),
            description: None,
        }
    }
}

/// A lightweight match record produced by similarity search
///
/// Transient: created per retrieval call and discarded after candidates
/// are mapped back to full registry entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarEntity {
    /// Entity name used for the registry lookup
    pub name: String,

    /// Method signature, when the index stores one
    pub signature: Option<String>,

    /// Package, when the index stores one
    pub package: Option<String>,

    /// Owning class, for method candidates
    pub class_name: Option<String>,

    /// Similarity score in [0, 1], higher is better
    pub score: f32,

    /// Which population the match came from
    pub kind: EntityKind,
}

impl SimilarEntity {
    pub fn new(name: impl Into<String>, score: f32, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            signature: None,
            package: None,
            class_name: None,
            score,
            kind,
        }
    }
}

/// Outcome of the embedding pre-filter stage, one per query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreFilteringResult {
    /// Classes that survived filtering
    pub classes: Vec<ClassEntity>,

    /// Methods that survived filtering
    pub methods: Vec<MethodEntity>,

    /// Combined population size before filtering
    pub original_count: usize,

    /// Combined size after filtering
    pub filtered_count: usize,

    /// round(100 * (1 - filtered/original)), 0 when the original is empty
    pub reduction_percentage: u8,

    /// Candidates dropped because no registry entity carried their name
    pub unmatched_count: usize,
}

impl PreFilteringResult {
    /// Builds a result for a successful filter pass, computing the counts
    /// and reduction from the surviving lists.
    pub fn filtered(
        classes: Vec<ClassEntity>,
        methods: Vec<MethodEntity>,
        original_count: usize,
        unmatched_count: usize,
    ) -> Self {
        let filtered_count = classes.len() + methods.len();
        Self {
            classes,
            methods,
            original_count,
            filtered_count,
            reduction_percentage: reduction_percentage(original_count, filtered_count),
            unmatched_count,
        }
    }

    /// Builds the degraded fallback result: the entire original population
    /// passes through unfiltered with zero reduction.
    pub fn passthrough(classes: Vec<ClassEntity>, methods: Vec<MethodEntity>) -> Self {
        let total = classes.len() + methods.len();
        Self {
            classes,
            methods,
            original_count: total,
            filtered_count: total,
            reduction_percentage: 0,
            unmatched_count: 0,
        }
    }
}

/// Percentage of the population removed by filtering, rounded to the
/// nearest integer. Zero when the original population is empty.
pub fn reduction_percentage(original: usize, filtered: usize) -> u8 {
    if original == 0 {
        return 0;
    }
    (100.0 * (1.0 - filtered as f64 / original as f64)).round() as u8
}

/// Structured output of a query: the entities the language model judged
/// relevant. List order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub classes: Vec<String>,
    pub methods: Vec<String>,
    /// Reserved for future extraction grammar extensions; always empty today
    pub packages: Vec<String>,
    /// Reserved for future extraction grammar extensions; always empty today
    pub terms: Vec<String>,
}

impl ExtractedEntities {
    pub fn new(classes: Vec<String>, methods: Vec<String>) -> Self {
        Self {
            classes,
            methods,
            packages: Vec::new(),
            terms: Vec::new(),
        }
    }

    /// The degraded "nothing found" value returned on any query failure
    pub fn empty() -> Self {
        Self::default()
    }

    /// True iff at least one of the four lists is non-empty
    pub fn has_entities(&self) -> bool {
        !self.classes.is_empty()
            || !self.methods.is_empty()
            || !self.packages.is_empty()
            || !self.terms.is_empty()
    }

    /// All four lists concatenated
    pub fn all_entities(&self) -> Vec<String> {
        let mut all = Vec::with_capacity(self.total_count());
        all.extend(self.classes.iter().cloned());
        all.extend(self.methods.iter().cloned());
        all.extend(self.packages.iter().cloned());
        all.extend(self.terms.iter().cloned());
        all
    }

    /// Combined size of the four lists
    pub fn total_count(&self) -> usize {
        self.classes.len() + self.methods.len() + self.packages.len() + self.terms.len()
    }
}
