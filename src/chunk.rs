//! Recursive character text splitter.
//!
//! Splits page text into [`Chunk`]s of at most `chunk_size` characters with
//! `chunk_overlap` characters carried over between neighbors. Splitting
//! tries coarse separators first (`\n\n`, then `\n`, then ` `) and falls
//! back to single characters, so paragraphs stay together whenever they fit.
//!
//! Lengths are counted in `char`s, not bytes.
//!
//! Each chunk receives a random UUID plus a SHA-256 hash of its text.

use std::collections::VecDeque;

use anyhow::{bail, Result};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::models::{Chunk, Page};

/// Separators tried in order. The empty separator splits into characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter with the default separators.
    ///
    /// Fails when `chunk_size` is zero or `chunk_overlap` exceeds it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            bail!("chunk_size must be > 0");
        }
        if chunk_overlap > chunk_size {
            bail!(
                "chunk_overlap ({}) must not exceed chunk_size ({})",
                chunk_overlap,
                chunk_size
            );
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn with_separators(mut self, separators: &[&str]) -> Self {
        self.separators = separators.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Split a single text into chunk strings.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let separators: Vec<&str> = self.separators.iter().map(String::as_str).collect();
        self.split_recursive(text, &separators)
    }

    /// Split every page, in order, into chunks with contiguous indices.
    ///
    /// Chunks never span a page boundary. Pages with no text produce no chunks.
    pub fn split_pages(&self, pages: &[Page]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut chunk_index: i64 = 0;
        for page in pages {
            for text in self.split_text(&page.text) {
                chunks.push(make_chunk(page.number, chunk_index, &text));
                chunk_index += 1;
            }
        }
        tracing::debug!(
            pages = pages.len(),
            chunks = chunks.len(),
            "split document"
        );
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Pick the first separator present in the text
        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = *sep;
                break;
            }
            if text.contains(*sep) {
                separator = *sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut out = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for piece in split_keep_separator(text, separator) {
            if piece.chars().count() < self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                out.extend(self.merge(&pending));
                pending.clear();
            }
            if finer.is_empty() {
                out.push(piece);
            } else {
                out.extend(self.split_recursive(&piece, finer));
            }
        }

        if !pending.is_empty() {
            out.extend(self.merge(&pending));
        }
        out
    }

    /// Greedily pack pieces into windows of at most `chunk_size` chars,
    /// carrying up to `chunk_overlap` chars of trailing pieces forward.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();
            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_window(&window) {
                    out.push(chunk);
                }
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }
            window.push_back((piece.as_str(), len));
            total += len;
        }

        if let Some(chunk) = join_window(&window) {
            out.push(chunk);
        }
        out
    }
}

/// Split on `separator`, attaching it to the start of the following piece.
/// Empty pieces are dropped; an empty separator yields single characters.
fn split_keep_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }
    let mut parts = text.split(separator);
    let mut out = Vec::new();
    if let Some(first) = parts.next() {
        out.push(first.to_string());
    }
    for part in parts {
        out.push(format!("{}{}", separator, part));
    }
    out.retain(|s| !s.is_empty());
    out
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(s, _)| *s).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn make_chunk(page: usize, index: i64, text: &str) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Chunk {
        id: Uuid::new_v4().to_string(),
        page,
        chunk_index: index,
        text: text.to_string(),
        hash,
    }
}
