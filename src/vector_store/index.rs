//! Persisted vector index, one directory per dataset.
//!
//! The index is a plain JSON file holding every document alongside its
//! embedding, plus a manifest header recording which embedding model
//! produced the vectors. Search is brute-force cosine similarity computed
//! in Rust, which is plenty for datasets of this size.
//!
//! Loading deserializes locally-produced data only. An index file from an
//! untrusted or remote source must never be loaded; the only supported
//! producer is `tycho index` writing into the local data directory.

use super::{cosine_similarity, Document, SearchResult};
use crate::error::{Result, TychoError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// File name of the index inside its directory.
const INDEX_FILE: &str = "index.json";

/// One (embedding, document) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    embedding: Vec<f32>,
    document: Document,
}

/// Serialized form of a whole index.
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    /// Identifier of the embedding model that produced every vector.
    embedding_model: String,
    /// Embedding dimensions.
    dimensions: usize,
    /// When the index was built.
    built_at: DateTime<Utc>,
    entries: Vec<IndexEntry>,
}

/// A read-only collection of embedded documents supporting nearest-neighbor
/// search. Built offline by the indexer, never mutated by queries.
#[derive(Debug)]
pub struct VectorIndex {
    embedding_model: String,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from (embedding, document) pairs.
    ///
    /// Every embedding must have the stated dimensions and every document
    /// must have non-empty content; both are enforced here so a persisted
    /// index can never violate them.
    pub fn build(
        embedding_model: &str,
        dimensions: usize,
        pairs: Vec<(Vec<f32>, Document)>,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (embedding, document) in pairs {
            if embedding.len() != dimensions {
                return Err(TychoError::Embedding(format!(
                    "embedding has {} dimensions, expected {}",
                    embedding.len(),
                    dimensions
                )));
            }
            if document.content.is_empty() {
                return Err(TychoError::SourceRecord(
                    "document with empty content cannot be indexed".to_string(),
                ));
            }
            entries.push(IndexEntry {
                embedding,
                document,
            });
        }

        Ok(Self {
            embedding_model: embedding_model.to_string(),
            dimensions,
            entries,
        })
    }

    /// Persist the index under `dir`, replacing any prior index there.
    #[instrument(skip(self), fields(model = %self.embedding_model, entries = self.entries.len()))]
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let file = IndexFile {
            embedding_model: self.embedding_model.clone(),
            dimensions: self.dimensions,
            built_at: Utc::now(),
            entries: self.entries.clone(),
        };

        // Write to a temp file first so a failed save never leaves a
        // half-written index behind.
        let final_path = dir.join(INDEX_FILE);
        let tmp_path = dir.join(format!("{}.tmp", INDEX_FILE));
        let json = serde_json::to_vec(&file)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &final_path)?;

        info!("Saved {} documents to {}", self.entries.len(), final_path.display());
        Ok(())
    }

    /// Load a previously persisted index from `dir`.
    ///
    /// Fails with [`TychoError::IndexLoad`] if the index is missing,
    /// corrupt, or was built with a different embedding model or dimension
    /// count than the one configured for querying. Mixing embedding spaces
    /// would silently produce garbage similarity scores, so it is rejected
    /// here rather than detected downstream.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path, expected_model: &str, expected_dimensions: usize) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        if !path.exists() {
            return Err(TychoError::IndexLoad(format!(
                "no index at {}. Run 'tycho index' first.",
                path.display()
            )));
        }

        let content = std::fs::read(&path)
            .map_err(|e| TychoError::IndexLoad(format!("{}: {}", path.display(), e)))?;
        let file: IndexFile = serde_json::from_slice(&content)
            .map_err(|e| TychoError::IndexLoad(format!("{} is corrupt: {}", path.display(), e)))?;

        if file.embedding_model != expected_model {
            return Err(TychoError::IndexLoad(format!(
                "{} was built with embedding model '{}' but '{}' is configured; rebuild the index",
                path.display(),
                file.embedding_model,
                expected_model
            )));
        }
        if file.dimensions != expected_dimensions {
            return Err(TychoError::IndexLoad(format!(
                "{} has {}-dimensional embeddings but {} are configured; rebuild the index",
                path.display(),
                file.dimensions,
                expected_dimensions
            )));
        }
        if let Some(bad) = file.entries.iter().find(|e| e.embedding.len() != file.dimensions) {
            return Err(TychoError::IndexLoad(format!(
                "{} is corrupt: entry '{}' has {} dimensions, manifest says {}",
                path.display(),
                bad.document.title(),
                bad.embedding.len(),
                file.dimensions
            )));
        }

        debug!("Loaded {} documents (built {})", file.entries.len(), file.built_at);

        Ok(Self {
            embedding_model: file.embedding_model,
            dimensions: file.dimensions,
            entries: file.entries,
        })
    }

    /// Search for the `k` documents most similar to the query embedding.
    ///
    /// Results are ordered by descending similarity; ties keep insertion
    /// order. Returns fewer than `k` results if the index holds fewer
    /// documents, and an empty vec for an empty index.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                document: entry.document.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        // Stable sort preserves insertion order among equal scores.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);
        results
    }

    /// The embedding model identifier this index was built with.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Number of documents in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
