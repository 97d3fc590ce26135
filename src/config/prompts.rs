//! Prompt templates for Tycho.
//!
//! Prompts can be customized by placing a TOML file in the custom prompts
//! directory configured under `[prompts]`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// Instruction preamble placed at the top of every assembled prompt:
    /// assistant persona and style directives.
    pub preamble: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            preamble: "You are a helpful and intelligent NASA research assistant. \
Based on the following documents, provide a detailed, beginner-friendly, and clearly explained answer.\n\n\
Be descriptive, include analogies or examples if possible. If the user is asking a follow-up question, \
answer it in the context of the previous chat history."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from `rag.toml` in the custom
    /// directory if one is configured.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());
            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}
