//! TOML configuration.
//!
//! Every value has a built-in default matching the stock setup (a local
//! Ollama with `llama2` and `nomic-embed-text`), so the config file is
//! optional. See [`load_or_default`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Request timeout. Unset means model calls may block indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama2".to_string()
}
fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1500
}
fn default_chunk_overlap() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
    /// Load a persisted index without any integrity check.
    ///
    /// Security note: the index directory is trusted completely. Anyone who
    /// can write to it controls what the program loads. Set to `false` to
    /// refuse loading an existing index.
    #[serde(default = "default_allow_dangerous")]
    pub allow_dangerous_deserialization: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            allow_dangerous_deserialization: default_allow_dangerous(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("faiss_index")
}
fn default_allow_dangerous() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    /// Characters of joined chunk text handed to the question prompt.
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            num_questions: default_num_questions(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_num_questions() -> usize {
    10
}
fn default_excerpt_chars() -> usize {
    3500
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::default`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    // Validate chunking
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.chunk_overlap > config.chunking.chunk_size {
        anyhow::bail!(
            "chunking.chunk_overlap ({}) must not exceed chunking.chunk_size ({})",
            config.chunking.chunk_overlap,
            config.chunking.chunk_size
        );
    }

    // Validate quiz
    if config.quiz.num_questions == 0 {
        anyhow::bail!("quiz.num_questions must be > 0");
    }
    if config.quiz.excerpt_chars == 0 {
        anyhow::bail!("quiz.excerpt_chars must be > 0");
    }

    // Validate ollama
    if config.ollama.model.trim().is_empty() {
        anyhow::bail!("ollama.model must not be empty");
    }
    if config.ollama.embedding_model.trim().is_empty() {
        anyhow::bail!("ollama.embedding_model must not be empty");
    }
    if !(config.ollama.url.starts_with("http://") || config.ollama.url.starts_with("https://")) {
        anyhow::bail!(
            "ollama.url must start with http:// or https://, got '{}'",
            config.ollama.url
        );
    }

    Ok(())
}
