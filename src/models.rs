//! Core data models used throughout the quiz pipeline.
//!
//! These types represent the pages, chunks, and questions that flow from
//! the PDF through the splitter and index into the quiz session.

use serde::{Deserialize, Serialize};

/// One page of extracted document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Source file path as supplied by the user.
    pub source: String,
    /// 0-based page number.
    pub number: usize,
    pub text: String,
}

/// A chunk of a page's text.
///
/// Chunk indices are contiguous across the whole document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub page: usize,
    pub chunk_index: i64,
    pub text: String,
    pub hash: String,
}

/// A generated quiz question, kept verbatim as the model wrote it.
///
/// Multiple-choice options (`A)` .. `D)`) stay inline in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(pub String);

impl Question {
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
