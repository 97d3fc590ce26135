//! Configuration module for Tycho.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    ChatSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, IndexSettings,
    PromptSettings, RetrievalSettings, Settings, TechTransferSettings,
};
