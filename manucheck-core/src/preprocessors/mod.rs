//! Manuscript Preprocessors
//!
//! This module provides the extraction layer that turns an uploaded file
//! into the plain text the structure validator consumes.
//!
//! ## Architecture
//!
//! ```text
//! Upload (TXT, MD, DOCX, PDF) + declared extension
//!     ↓
//! [DocumentFormat::from_extension]
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! Plain text
//!     ↓
//! [StructureValidator]
//! ```
//!
//! ## Available Preprocessors
//!
//! - `PlainTextPreprocessor` - plain text and markdown (UTF-8 decode)
//! - `DocxPreprocessor` - Word documents (paragraph text)
//! - `PdfPreprocessor` - PDF documents (per-page text)

pub mod docx;
pub mod pdf;
pub mod plain;
pub mod traits;

use crate::error::ExtractionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// Re-export main types
pub use docx::DocxPreprocessor;
pub use pdf::PdfPreprocessor;
pub use plain::PlainTextPreprocessor;
pub use traits::Preprocessor;

/// Upload formats the extraction layer understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Docx,
    Pdf,
}

impl DocumentFormat {
    /// Classify a declared extension. Case-insensitive, leading dot optional.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractionError> {
        let normalized = extension.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "txt" | "text" => Ok(DocumentFormat::PlainText),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            "docx" => Ok(DocumentFormat::Docx),
            "pdf" => Ok(DocumentFormat::Pdf),
            _ => Err(ExtractionError::Unsupported {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn preprocessor(&self) -> Box<dyn Preprocessor> {
        match self {
            DocumentFormat::PlainText | DocumentFormat::Markdown => {
                Box::new(PlainTextPreprocessor::new())
            }
            DocumentFormat::Docx => Box::new(DocxPreprocessor::new()),
            DocumentFormat::Pdf => Box::new(PdfPreprocessor::new()),
        }
    }

    pub fn all() -> [DocumentFormat; 4] {
        [
            DocumentFormat::PlainText,
            DocumentFormat::Markdown,
            DocumentFormat::Docx,
            DocumentFormat::Pdf,
        ]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "txt",
            DocumentFormat::Markdown => "md",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extract best-effort plain text from an upload with a declared extension.
pub fn extract_text(bytes: &[u8], declared_extension: &str) -> Result<String, ExtractionError> {
    let format = DocumentFormat::from_extension(declared_extension)?;
    let preprocessor = format.preprocessor();
    tracing::debug!(
        format = %format,
        preprocessor = preprocessor.name(),
        bytes = bytes.len(),
        "extracting text"
    );
    preprocessor.extract_text(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching_is_lenient() {
        assert_eq!(DocumentFormat::from_extension(".PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_extension("Md").unwrap(), DocumentFormat::Markdown);
        assert_eq!(
            DocumentFormat::from_path(Path::new("paper.final.docx")).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_unsupported_extensions() {
        for ext in ["odt", "doc", "rtf", ""] {
            let err = DocumentFormat::from_extension(ext).unwrap_err();
            assert_eq!(err.reason(), "unsupported", "{ext}");
        }
        assert!(DocumentFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_each_format_routes_to_a_supporting_preprocessor() {
        for format in DocumentFormat::all() {
            assert!(
                format.preprocessor().supports_extension(format.extension()),
                "{format}"
            );
        }
    }

    #[test]
    fn test_extract_markdown() {
        let text = extract_text(b"# Title\n\n## Abstract\nShort.", "md").unwrap();
        assert!(text.contains("## Abstract"));
    }
}
