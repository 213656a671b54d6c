//! Resume text extraction.
//!
//! Supports PDF (via pdf-extract), DOCX (via docx-rs) and plain text.
//! Text is returned in document order as a single string.

use crate::error::AtsError;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::fs;
use std::path::Path;
use tracing::debug;

/// File extensions we can extract text from (lowercase, without dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// Returns true if the path has a supported extension.
pub fn is_supported(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extract the text content of a resume document.
pub fn extract_text(path: &Path) -> Result<String, AtsError> {
    let text = match extension_of(path).as_deref() {
        Some("pdf") => extract_pdf(path)?,
        Some("docx") => extract_docx(path)?,
        Some("txt") => fs::read_to_string(path).map_err(|e| extraction_error(path, e))?,
        _ => {
            return Err(AtsError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn extraction_error(path: &Path, err: impl std::fmt::Display) -> AtsError {
    AtsError::Extraction {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn extract_pdf(path: &Path) -> Result<String, AtsError> {
    let bytes = fs::read(path).map_err(|e| extraction_error(path, e))?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| extraction_error(path, e))
}

/// Paragraph texts joined by a single space, empty paragraphs skipped.
fn extract_docx(path: &Path) -> Result<String, AtsError> {
    let bytes = fs::read(path).map_err(|e| extraction_error(path, e))?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| extraction_error(path, format!("{:?}", e)))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join(" "))
}

/// Runs within a paragraph are parts of the same sentence, so no separator.
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
