//! Tycho - NASA Innovation Q&A
//!
//! A CLI tool for retrieval-augmented question answering over NASA's
//! TechPort (internal R&D) and TechTransfer (patents & spinoffs) datasets.
//!
//! The name "Tycho" comes from the lunar crater.
//!
//! # Overview
//!
//! Tycho allows you to:
//! - Embed NASA TechPort and TechTransfer records into persisted vector indexes
//! - Ask innovation and technology questions and get AI-powered answers
//! - See the source documents behind every answer, with provenance
//! - Hold a follow-up conversation with a bounded rolling history
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `loader` - Source record loading (TechPort CSV, TechTransfer API)
//! - `embedding` - Embedding generation
//! - `generation` - Answer generation
//! - `vector_store` - Persisted vector index
//! - `indexer` - Offline index building
//! - `memory` - Bounded conversation memory
//! - `prompt` - Deterministic prompt assembly
//! - `pipeline` - Query-time answer pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use tycho::config::Settings;
//! use tycho::memory::ConversationMemory;
//! use tycho::pipeline::AnswerPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = AnswerPipeline::load(&settings)?;
//!     let mut memory = ConversationMemory::new(settings.chat.max_history);
//!
//!     let answer = pipeline.answer("Any NASA research related to lunar habitats?", &mut memory).await?;
//!     if let Some(reply) = answer.reply {
//!         println!("{}", reply);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod indexer;
pub mod loader;
pub mod memory;
pub mod pipeline;
pub mod prompt;
pub mod vector_store;

pub use error::{Result, TychoError};
