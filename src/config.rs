//! Configuration for the service
//!
//! Non-secret settings load from an optional TOML file with per-section
//! defaults. The two secrets (MongoDB URI, OpenAI API key) come only from
//! the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable holding the MongoDB connection URI
pub const ENV_MONGO_URI: &str = "DOCGPT_MONGO_URI";

/// Environment variable holding the OpenAI API key
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// LLM / embedding configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub rag: RagSettings,
}

impl Config {
    /// Load configuration from a TOML file, or defaults if `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                toml::from_str(&contents)
                    .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
            }
            None => Ok(Self::default()),
        }
    }

    /// MongoDB connection URI, from the environment only.
    pub fn mongo_uri(&self) -> Result<String> {
        std::env::var(ENV_MONGO_URI)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_MONGO_URI)))
    }

    /// OpenAI API key, from the environment only.
    pub fn openai_api_key(&self) -> Result<String> {
        std::env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_OPENAI_API_KEY)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Credential store configuration (connection URI comes from the environment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database name
    pub database: String,
    /// Users collection name
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: "test".to_string(),
            collection: "users".to_string(),
        }
    }
}

/// LLM and embedding configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// Chat model name
    pub chat_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions
    pub embedding_dimensions: usize,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens per answer
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: 1536,
            temperature: 0.5,
            max_tokens: 1000,
            timeout_secs: 120,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagSettings {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 0,
            top_k: 5,
        }
    }
}
