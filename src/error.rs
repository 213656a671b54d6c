//! Error types for the resume analysis pipeline.
//!
//! Extraction and inference errors are fatal to a run. Render errors are
//! reported by the caller and otherwise ignored. Parsing has no error type:
//! malformed model output degrades to empty fields.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that can surface from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AtsError {
    /// The file extension is not one we can extract text from.
    #[error("Unsupported file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The document exists but could not be read or parsed.
    #[error("Failed to extract text from {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    /// The inference backend failed or returned a non-zero exit status.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The mind map could not be rendered.
    #[error("Failed to render mind map: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_and_render_messages() {
        assert_eq!(
            AtsError::Inference("exit 1".to_string()).to_string(),
            "Inference failed: exit 1"
        );
        assert_eq!(
            AtsError::Render("dot missing".to_string()).to_string(),
            "Failed to render mind map: dot missing"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AtsError::Extraction {
            path: PathBuf::from("cv.pdf"),
            message: "bad xref".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to extract text from cv.pdf: bad xref"
        );

        let err = AtsError::UnsupportedFormat {
            path: PathBuf::from("cv.odt"),
        };
        assert_eq!(err.to_string(), "Unsupported file format: cv.odt");
    }
}
