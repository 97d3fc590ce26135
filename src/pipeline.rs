//! Query-time answer pipeline.
//!
//! One query flows linearly through: retrieve from every configured index,
//! record the user turn, assemble the prompt, generate, record the
//! assistant turn on success. Conversation memory is owned by the caller
//! and passed in explicitly, so the pipeline itself is stateless between
//! queries and independently testable.

use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, GeminiEmbedder};
use crate::error::{Result, TychoError};
use crate::generation::{GeminiGenerator, Generator};
use crate::memory::{ConversationMemory, Turn};
use crate::prompt::{assemble, RetrievedSet};
use crate::vector_store::VectorIndex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A loaded index with its configured display name.
pub struct NamedIndex {
    pub name: String,
    pub index: VectorIndex,
}

/// The outcome of one query.
#[derive(Debug)]
pub struct Answer {
    /// Generated reply, `None` when generation failed.
    pub reply: Option<String>,
    /// Generation error text when `reply` is `None`.
    pub error: Option<String>,
    /// Retrieved documents per index, in configured index order.
    pub sources: Vec<RetrievedSet>,
}

/// Orchestrates retrieval, prompt assembly, and generation for one query
/// at a time.
pub struct AnswerPipeline {
    indexes: Vec<NamedIndex>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    top_k: usize,
}

impl AnswerPipeline {
    /// Load every configured index and construct the service clients.
    ///
    /// Fails fast if a credential is missing or any index cannot be loaded;
    /// nothing is served from a partially loaded pipeline.
    pub fn load(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let embedder = Arc::new(GeminiEmbedder::new(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        )?);
        let generator = Arc::new(GeminiGenerator::new(&settings.generation.model)?);

        let mut indexes = Vec::with_capacity(settings.indexes.len());
        for index_settings in &settings.indexes {
            let index = VectorIndex::load(
                &settings.index_dir(index_settings),
                &settings.embedding.model,
                settings.embedding.dimensions as usize,
            )?;
            info!("Loaded index '{}' ({} documents)", index_settings.name, index.len());
            indexes.push(NamedIndex {
                name: index_settings.name.clone(),
                index,
            });
        }

        Ok(Self {
            indexes,
            embedder,
            generator,
            prompts,
            top_k: settings.retrieval.top_k,
        })
    }

    /// Construct a pipeline from pre-built components.
    pub fn with_components(
        indexes: Vec<NamedIndex>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        prompts: Prompts,
        top_k: usize,
    ) -> Self {
        Self {
            indexes,
            embedder,
            generator,
            prompts,
            top_k,
        }
    }

    /// Answer one query, updating `memory` in place.
    ///
    /// Retrieval failure aborts the query with `memory` untouched.
    /// Generation failure returns a `None` reply with the error text; the
    /// user's turn stays recorded so a retry still has correct context, and
    /// no assistant turn is added.
    #[instrument(skip(self, memory), fields(query = %query))]
    pub async fn answer(&self, query: &str, memory: &mut ConversationMemory) -> Result<Answer> {
        // Retrieve from each configured index before touching memory.
        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| TychoError::Retrieval(e.to_string()))?;

        let sources: Vec<RetrievedSet> = self
            .indexes
            .iter()
            .map(|named| RetrievedSet {
                index: named.name.clone(),
                documents: named
                    .index
                    .search(&query_embedding, self.top_k)
                    .into_iter()
                    .map(|result| result.document)
                    .collect(),
            })
            .collect();

        memory.append(Turn::user(query));

        let prompt = assemble(&self.prompts.preamble, query, &sources, &memory.render());
        debug!("Assembled prompt of {} characters", prompt.len());

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                let reply = text.trim().to_string();
                memory.append(Turn::assistant(reply.clone()));
                Ok(Answer {
                    reply: Some(reply),
                    error: None,
                    sources,
                })
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                Ok(Answer {
                    reply: None,
                    error: Some(e.to_string()),
                    sources,
                })
            }
        }
    }

    /// Embed a query and return scored matches from each index, without
    /// calling the generator. Used by the `search` command.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<(String, Vec<crate::vector_store::SearchResult>)>> {
        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| TychoError::Retrieval(e.to_string()))?;

        Ok(self
            .indexes
            .iter()
            .map(|named| (named.name.clone(), named.index.search(&query_embedding, limit)))
            .collect())
    }

    /// Names of the loaded indexes, in configured order.
    pub fn index_names(&self) -> Vec<&str> {
        self.indexes.iter().map(|named| named.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;
    use crate::vector_store::Document;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps identical texts to identical vectors so exact-content queries
    /// score 1.0 against their document.
    struct HashEmbedder {
        fail: bool,
    }

    fn hash_embedding(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; 8];
        for (i, b) in text.bytes().enumerate() {
            v[i % 8] += b as f32;
        }
        v
    }

    #[async_trait]
    impl Embedder for HashEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if self.fail {
                return Err(TychoError::Embedding("service unreachable".to_string()));
            }
            Ok(hash_embedding(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn model(&self) -> &str {
            "models/test-embedding"
        }

        fn dimensions(&self) -> usize {
            8
        }
    }

    struct ScriptedGenerator {
        fail: bool,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TychoError::Generation("quota exceeded".to_string()));
            }
            Ok(format!("  reply {}  ", n))
        }
    }

    fn doc(content: &str) -> Document {
        Document::new(content.to_string(), BTreeMap::new())
    }

    fn index_from(name: &str, contents: &[&str]) -> NamedIndex {
        let pairs = contents
            .iter()
            .copied()
            .map(|c| (hash_embedding(c), doc(c)))
            .collect();
        NamedIndex {
            name: name.to_string(),
            index: VectorIndex::build("models/test-embedding", 8, pairs).unwrap(),
        }
    }

    fn pipeline(generator: ScriptedGenerator) -> AnswerPipeline {
        AnswerPipeline::with_components(
            vec![
                index_from("TechPort", &["habitat module design", "lunar regolith shielding"]),
                index_from("TechTransfer", &[]),
            ],
            Arc::new(HashEmbedder { fail: false }),
            Arc::new(generator),
            Prompts::default(),
            3,
        )
    }

    #[tokio::test]
    async fn test_successful_query_records_both_turns() {
        let pipeline = pipeline(ScriptedGenerator::ok());
        let mut memory = ConversationMemory::new(6);

        let answer = pipeline.answer("lunar habitats", &mut memory).await.unwrap();

        assert_eq!(answer.reply.as_deref(), Some("reply 0"));
        assert!(answer.error.is_none());

        // Sections in configured order, with per-index document counts.
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(answer.sources[0].index, "TechPort");
        assert_eq!(answer.sources[0].documents.len(), 2);
        assert_eq!(answer.sources[1].index, "TechTransfer");
        assert!(answer.sources[1].documents.is_empty());

        let snapshot = memory.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, Role::User);
        assert_eq!(snapshot[0].text, "lunar habitats");
        assert_eq!(snapshot[1].role, Role::Assistant);
        assert_eq!(snapshot[1].text, "reply 0");
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_only_user_turn() {
        let pipeline = pipeline(ScriptedGenerator::failing());
        let mut memory = ConversationMemory::new(6);

        let answer = pipeline.answer("lunar habitats", &mut memory).await.unwrap();

        assert!(answer.reply.is_none());
        assert!(answer.error.as_deref().unwrap().contains("quota exceeded"));
        assert_eq!(answer.sources.len(), 2);

        let snapshot = memory.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_history_stays_pinned_at_cap_across_cycles() {
        let pipeline = pipeline(ScriptedGenerator::ok());
        let mut memory = ConversationMemory::new(6);

        for i in 0..7 {
            let answer = pipeline
                .answer(&format!("question {}", i), &mut memory)
                .await
                .unwrap();
            assert!(answer.reply.is_some());
            // Each cycle adds two turns; the cap binds from the fourth on.
            assert_eq!(memory.len(), 6.min((i + 1) * 2));
        }

        let snapshot = memory.snapshot();
        assert_eq!(snapshot.len(), 6);
        assert_eq!(snapshot[0].text, "question 4");
        assert_eq!(snapshot[5].text, "reply 6");
    }

    #[tokio::test]
    async fn test_retrieval_failure_leaves_memory_untouched() {
        let pipeline = AnswerPipeline::with_components(
            vec![index_from("TechPort", &["habitat module design"])],
            Arc::new(HashEmbedder { fail: true }),
            Arc::new(ScriptedGenerator::ok()),
            Prompts::default(),
            3,
        );
        let mut memory = ConversationMemory::new(6);

        let err = pipeline.answer("lunar habitats", &mut memory).await.unwrap_err();
        assert!(matches!(err, TychoError::Retrieval(_)));
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_history_includes_current_question() {
        struct CapturingGenerator {
            prompts: std::sync::Mutex<Vec<String>>,
        }

        #[async_trait]
        impl Generator for CapturingGenerator {
            async fn generate(&self, prompt: &str) -> Result<String> {
                self.prompts.lock().unwrap().push(prompt.to_string());
                Ok("ok".to_string())
            }
        }

        let generator = Arc::new(CapturingGenerator {
            prompts: std::sync::Mutex::new(Vec::new()),
        });
        let pipeline = AnswerPipeline::with_components(
            vec![index_from("TechPort", &["habitat module design"])],
            Arc::new(HashEmbedder { fail: false }),
            generator.clone(),
            Prompts::default(),
            3,
        );

        let mut memory = ConversationMemory::new(6);
        pipeline.answer("lunar habitats", &mut memory).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Chat history (for context):\nUser: lunar habitats"));
        assert!(prompts[0].contains("User question: lunar habitats"));
        assert!(prompts[0].contains("Documents from TechPort:"));
    }

    #[tokio::test]
    async fn test_search_returns_scored_results_per_index() {
        let pipeline = pipeline(ScriptedGenerator::ok());
        let results = pipeline.search("habitat module design", 1).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "TechPort");
        assert_eq!(results[0].1.len(), 1);
        assert_eq!(results[0].1[0].document.content, "habitat module design");
        assert!((results[0].1[0].score - 1.0).abs() < 0.001);
        assert!(results[1].1.is_empty());
    }
}
