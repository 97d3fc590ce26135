//! Configuration settings for Tycho.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub retrieval: RetrievalSettings,
    pub chat: ChatSettings,
    /// Queryable indexes, in prompt section order.
    pub indexes: Vec<IndexSettings>,
    pub techtransfer: TechTransferSettings,
    pub prompts: PromptSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            embedding: EmbeddingSettings::default(),
            generation: GenerationSettings::default(),
            retrieval: RetrievalSettings::default(),
            chat: ChatSettings::default(),
            indexes: vec![
                IndexSettings {
                    name: "TechPort".to_string(),
                    dir: "techport_index".to_string(),
                },
                IndexSettings {
                    name: "TechTransfer".to_string(),
                    dir: "techtransfer_index".to_string(),
                },
            ],
            techtransfer: TechTransferSettings::default(),
            prompts: PromptSettings::default(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.tycho".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "models/embedding-001".to_string(),
            dimensions: 768,
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// LLM model for response generation.
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Documents retrieved per index for each query.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Chat session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Maximum retained conversation turns (3 user/assistant pairs by default).
    pub max_history: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_history: crate::memory::DEFAULT_MAX_HISTORY,
        }
    }
}

/// One configured vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Display name, used in prompt section labels.
    pub name: String,
    /// Directory name under `<data_dir>/vectorstores/`.
    pub dir: String,
}

/// NASA TechTransfer API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TechTransferSettings {
    /// API base URL.
    pub base_url: String,
    /// Default patent search query for indexing.
    pub default_query: String,
}

impl Default for TechTransferSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.nasa.gov/techtransfer".to_string(),
            default_query: "robotics".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tycho")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Directory holding a configured index's persisted files.
    pub fn index_dir(&self, index: &IndexSettings) -> PathBuf {
        self.data_dir().join("vectorstores").join(&index.dir)
    }

    /// Find a configured index by name (case-insensitive).
    pub fn index_named(&self, name: &str) -> Option<&IndexSettings> {
        self.indexes
            .iter()
            .find(|idx| idx.name.eq_ignore_ascii_case(name))
    }
}
