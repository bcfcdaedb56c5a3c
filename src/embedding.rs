//! Embedding provider abstraction and the Ollama implementation.
//!
//! Defines the [`Embedder`] trait and [`OllamaEmbedder`], which calls a
//! local Ollama instance's `POST /api/embed` endpoint.
//!
//! Also provides vector utilities used by the on-disk index:
//! - [`cosine_similarity`]: compute similarity between two embedding vectors
//! - [`vec_to_blob`]: encode a `Vec<f32>` as little-endian bytes
//! - [`blob_to_vec`]: decode little-endian bytes back into a `Vec<f32>`
//!
//! Requests are sent once. There is no retry: an unreachable endpoint or a
//! non-success status is returned as an error to the caller.

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::OllamaConfig;
use crate::llm::build_http_client;

/// Trait for embedding providers.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"nomic-embed-text"`).
    fn model_name(&self) -> &str;

    /// Embed a batch of texts, returning one vector per text in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_documents(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Empty embedding response"))
    }
}

// ============ Ollama Provider ============

/// Embedding provider using an Ollama instance.
///
/// Requires the embedding model to be pulled (e.g. `ollama pull nomic-embed-text`).
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            url: config.url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        tracing::debug!(model = %self.model, texts = texts.len(), "embedding request");

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Ollama connection error (is Ollama running at {}?): {}",
                    self.url,
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        let embeddings = parse_ollama_response(&json)?;
        if embeddings.len() != texts.len() {
            bail!(
                "Ollama returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            );
        }
        Ok(embeddings)
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());

    for embedding in embeddings {
        let vec: Vec<f32> = embedding
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: embedding is not an array"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        result.push(vec);
    }

    Ok(result)
}

/// Encode a float vector as little-endian `f32` bytes.
///
/// ```rust
/// use pdf_quiz::embedding::{vec_to_blob, blob_to_vec};
///
/// let v = vec![1.0f32, -2.5, 3.125];
/// let blob = vec_to_blob(&v);
/// assert_eq!(blob.len(), 12); // 3 × 4 bytes
/// assert_eq!(blob_to_vec(&blob), v);
/// ```
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode bytes back into a float vector. Trailing partial values are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns `0.0` for empty vectors, vectors of different lengths, or
/// zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
