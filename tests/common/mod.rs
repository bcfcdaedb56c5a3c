//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Minimal valid PDF with one page per entry in `pages`, each page drawing
/// its text with Helvetica. Builds the body first, then an xref table with
/// correct byte offsets so pdf-extract can parse it.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    // Object numbers: 1 catalog, 2 page tree, 3 font, then (page, contents) pairs
    let page_obj = |i: usize| 4 + 2 * i;
    let contents_obj = |i: usize| 5 + 2 * i;
    let total_objects = 3 + 2 * page_count;

    let mut out = Vec::new();
    let mut offsets = Vec::with_capacity(total_objects);
    out.extend_from_slice(b"%PDF-1.4\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");

    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", page_obj(i)))
        .collect::<Vec<_>>()
        .join(" ");
    offsets.push(out.len());
    out.extend_from_slice(
        format!(
            "2 0 obj << /Type /Pages /Kids [{}] /Count {} >> endobj\n",
            kids, page_count
        )
        .as_bytes(),
    );

    offsets.push(out.len());
    out.extend_from_slice(
        b"3 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >> endobj\n",
    );

    for (i, text) in pages.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >> endobj\n",
                page_obj(i),
                contents_obj(i)
            )
            .as_bytes(),
        );

        let stream = format!("BT /F1 12 Tf 72 700 Td ({}) Tj ET", text);
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
                contents_obj(i),
                stream.len(),
                stream
            )
            .as_bytes(),
        );
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", total_objects + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            total_objects + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}

/// Two short pages; each fits in a single chunk.
pub fn two_page_pdf() -> Vec<u8> {
    pdf_with_pages(&[
        "Rust was first released in 2015",
        "Cargo is the Rust package manager",
    ])
}

pub fn write_pdf(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}
