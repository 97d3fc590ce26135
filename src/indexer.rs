//! Offline index building.
//!
//! Embeds a document set and persists it as a named vector index. An index
//! is all-or-nothing per run: any embedding failure aborts before anything
//! is written, and a successful rebuild wholly replaces the prior index.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{Document, VectorIndex};
use std::path::Path;
use tracing::{info, instrument};

/// Embed `documents` and persist the resulting index under `dir`.
///
/// Returns the number of indexed documents.
#[instrument(skip(documents, embedder), fields(documents = documents.len()))]
pub async fn build_index(
    documents: Vec<Document>,
    embedder: &dyn Embedder,
    dir: &Path,
) -> Result<usize> {
    info!("Embedding {} documents", documents.len());

    let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let pairs: Vec<(Vec<f32>, Document)> = embeddings.into_iter().zip(documents).collect();
    let count = pairs.len();

    let index = VectorIndex::build(embedder.model(), embedder.dimensions(), pairs)?;
    index.save(dir)?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TychoError;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct FixedEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.embed_batch(&[text.to_string()])
                .await
                .map(|mut v| v.remove(0))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.fail {
                return Err(TychoError::Embedding("service unreachable".to_string()));
            }
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, 1.0, 0.0])
                .collect())
        }

        fn model(&self) -> &str {
            "models/test-embedding"
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn doc(content: &str) -> Document {
        Document::new(content.to_string(), BTreeMap::new())
    }

    #[tokio::test]
    async fn test_build_index_persists_documents() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![doc("Title: A\n\nDescription: a"), doc("Title: B\n\nDescription: bb")];

        let count = build_index(docs, &FixedEmbedder { fail: false }, dir.path())
            .await
            .unwrap();
        assert_eq!(count, 2);

        let index = VectorIndex::load(dir.path(), "models/test-embedding", 3).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![doc("Title: A\n\nDescription: a")];

        let err = build_index(docs, &FixedEmbedder { fail: true }, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, TychoError::Embedding(_)));
        assert!(VectorIndex::load(dir.path(), "models/test-embedding", 3).is_err());
    }
}
