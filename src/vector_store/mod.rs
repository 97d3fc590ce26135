//! Vector index for Tycho.
//!
//! Documents, similarity scoring, and the persisted per-dataset index.

mod index;

pub use index::VectorIndex;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel title shown when a document carries no title metadata.
pub const NO_TITLE: &str = "No Title";

/// A unit of retrievable knowledge stored in a vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The text that was embedded and is searched.
    pub content: String,
    /// Provenance fields (identifier, taxonomy, source URL, source name).
    ///
    /// A `BTreeMap` keeps serialization deterministic. Values are optional
    /// because some source columns are genuinely absent for some records.
    pub metadata: BTreeMap<String, Option<String>>,
}

impl Document {
    /// Create a new document.
    pub fn new(content: String, metadata: BTreeMap<String, Option<String>>) -> Self {
        Self { content, metadata }
    }

    /// The document title for citation display.
    pub fn title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(|v| v.as_deref())
            .unwrap_or(NO_TITLE)
    }

    /// Look up a metadata value by key.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_deref())
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
