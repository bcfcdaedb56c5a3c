//! PDF text extraction.
//!
//! Reads a PDF from disk and returns one [`Page`] per PDF page, in order.
//! Parsing is delegated to `pdf-extract`; no fallback extractor is tried.

use std::path::Path;

use thiserror::Error;

use crate::models::Page;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Load a PDF file and extract its pages.
///
/// The path is used as given; callers trim user input before calling.
pub fn load_pdf(path: &Path) -> Result<Vec<Page>, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let source = path.display().to_string();
    let pages = extract_pages(&bytes)?
        .into_iter()
        .enumerate()
        .map(|(number, text)| Page {
            source: source.clone(),
            number,
            text,
        })
        .collect::<Vec<_>>();
    tracing::info!(path = %source, pages = pages.len(), "loaded PDF");
    Ok(pages)
}

/// Extract page texts from in-memory PDF bytes.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}
