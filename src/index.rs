//! Persistent similarity index over document chunks.
//!
//! The index lives in a directory (`faiss_index` by default) holding two
//! files:
//!
//! | File | Contents |
//! |------|----------|
//! | `index.json` | format version, embedding model, dimensions, creation time, chunk docstore |
//! | `index.bin` | all vectors, concatenated little-endian `f32` |
//!
//! [`VectorIndex::load_or_create`] loads the directory when it exists and
//! otherwise embeds every chunk, builds the index and writes it out. There
//! is no invalidation: if the directory exists it is served as-is, even when
//! the current document produced different chunks.
//!
//! # Security
//!
//! Loading trusts the directory completely. Nothing checks that the vectors
//! belong to the docstore, that the dimensions are consistent, or that the
//! chunks match the document being quizzed. Whoever can write the directory
//! decides what is loaded. The trusted load only happens when
//! `allow_dangerous_deserialization` is set; otherwise an existing index is
//! refused with [`IndexError::UntrustedLoadRefused`].
//!
//! Concurrent runs against the same path are not coordinated: the
//! exists-check and the write are separate steps.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IndexConfig;
use crate::embedding::{blob_to_vec, cosine_similarity, vec_to_blob, Embedder};
use crate::models::Chunk;

const META_FILE: &str = "index.json";
const VECTORS_FILE: &str = "index.bin";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(
        "refusing to load existing index at {path} without allow_dangerous_deserialization; \
         delete the directory to rebuild it or enable the option if you trust its contents"
    )]
    UntrustedLoadRefused { path: PathBuf },
    #[error("no text chunks to index; the document has no extractable text")]
    NoChunks,
    #[error("embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Whether [`VectorIndex::load_or_create`] read an existing index or built one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    Loaded,
    Created,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexMeta {
    version: u32,
    embedding_model: String,
    dims: usize,
    created_at: DateTime<Utc>,
    entries: Vec<Chunk>,
}

/// Brute-force cosine similarity index over chunk embeddings.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    meta: IndexMeta,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Load the index at `config.path`, or build and persist a new one.
    pub async fn load_or_create(
        chunks: &[Chunk],
        embedder: &dyn Embedder,
        config: &IndexConfig,
    ) -> Result<(Self, IndexOrigin)> {
        let path = config.path.as_path();
        if path.exists() {
            if !config.allow_dangerous_deserialization {
                return Err(IndexError::UntrustedLoadRefused {
                    path: path.to_path_buf(),
                }
                .into());
            }
            tracing::warn!(
                path = %path.display(),
                "loading persisted index without integrity checks (allow_dangerous_deserialization = true)"
            );
            let index = Self::load(path)?;
            tracing::info!(
                path = %path.display(),
                entries = index.len(),
                model = %index.meta.embedding_model,
                "loaded existing index"
            );
            return Ok((index, IndexOrigin::Loaded));
        }

        tracing::info!(path = %path.display(), chunks = chunks.len(), "creating index");
        let index = Self::build(chunks, embedder).await?;
        index.save(path)?;
        Ok((index, IndexOrigin::Created))
    }

    /// Embed every chunk and build an in-memory index.
    ///
    /// Fails with [`IndexError::NoChunks`] when `chunks` is empty.
    pub async fn build(chunks: &[Chunk], embedder: &dyn Embedder) -> Result<Self> {
        if chunks.is_empty() {
            return Err(IndexError::NoChunks.into());
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder
            .embed_documents(&texts)
            .await
            .context("Failed to embed chunks for the index")?;

        let dims = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
            return Err(IndexError::DimensionMismatch {
                expected: dims,
                found: bad.len(),
            }
            .into());
        }

        Ok(Self {
            meta: IndexMeta {
                version: FORMAT_VERSION,
                embedding_model: embedder.model_name().to_string(),
                dims,
                created_at: Utc::now(),
                entries: chunks.to_vec(),
            },
            vectors,
        })
    }

    /// Write the index directory, creating it if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create index directory: {}", path.display()))?;

        let meta = serde_json::to_vec_pretty(&self.meta)?;
        std::fs::write(path.join(META_FILE), meta)
            .with_context(|| format!("Failed to write {}", path.join(META_FILE).display()))?;

        let mut blob = Vec::with_capacity(self.vectors.len() * self.meta.dims * 4);
        for v in &self.vectors {
            blob.extend_from_slice(&vec_to_blob(v));
        }
        std::fs::write(path.join(VECTORS_FILE), blob)
            .with_context(|| format!("Failed to write {}", path.join(VECTORS_FILE).display()))?;
        Ok(())
    }

    /// Read an index directory as-is. See the module docs on trust.
    pub fn load(path: &Path) -> Result<Self> {
        let meta_path = path.join(META_FILE);
        let raw = std::fs::read(&meta_path)
            .with_context(|| format!("Failed to read {}", meta_path.display()))?;
        let meta: IndexMeta = serde_json::from_slice(&raw)
            .with_context(|| format!("Failed to parse {}", meta_path.display()))?;

        let vectors_path = path.join(VECTORS_FILE);
        let blob = std::fs::read(&vectors_path)
            .with_context(|| format!("Failed to read {}", vectors_path.display()))?;
        let flat = blob_to_vec(&blob);
        let vectors = if meta.dims == 0 {
            Vec::new()
        } else {
            flat.chunks_exact(meta.dims).map(<[f32]>::to_vec).collect()
        };

        Ok(Self { meta, vectors })
    }

    /// Return the `k` entries most similar to `query`, best first.
    pub fn similarity_search(&self, query: &[f32], k: usize) -> Vec<(&Chunk, f32)> {
        let mut scored: Vec<(&Chunk, f32)> = self
            .meta
            .entries
            .iter()
            .zip(self.vectors.iter())
            .map(|(chunk, v)| (chunk, cosine_similarity(query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
    }

    pub fn entries(&self) -> &[Chunk] {
        &self.meta.entries
    }

    pub fn len(&self) -> usize {
        self.meta.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meta.entries.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.meta.dims
    }

    pub fn embedding_model(&self) -> &str {
        &self.meta.embedding_model
    }
}
