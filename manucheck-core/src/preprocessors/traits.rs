// Preprocessor abstraction for text extraction
//
// This module defines the boundary between file handling (upload bytes ->
// plain text) and structural validation (plain text -> report). The
// validator never sees file formats; everything format-specific lives
// behind this trait.

use crate::error::ExtractionError;

/// Preprocessor trait - converts an uploaded blob into best-effort plain text
///
/// Implementations handle:
/// - Container and encoding details (zip packages, PDF object streams, UTF-8)
/// - Reassembling text in reading order (paragraphs, pages)
///
/// Everything after this point works with `&str` and is format-agnostic.
pub trait Preprocessor: Send + Sync {
    /// Extract plain text from raw file bytes
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;

    /// Check if preprocessor handles the given (lowercase, dotless) extension
    fn supports_extension(&self, extension: &str) -> bool;
}
