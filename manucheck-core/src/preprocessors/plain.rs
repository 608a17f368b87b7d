//! Plain text and markdown preprocessor
//!
//! Both formats are already text: decode UTF-8 and drop a leading byte
//! order mark. Markdown markup is left in place; headings like `## Results`
//! still satisfy the section heuristics.

use super::traits::Preprocessor;
use crate::error::ExtractionError;

const BOM: char = '\u{feff}';

pub struct PlainTextPreprocessor;

impl PlainTextPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for PlainTextPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = String::from_utf8(bytes.to_vec())?;
        Ok(match text.strip_prefix(BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    fn name(&self) -> &str {
        "PlainTextPreprocessor"
    }

    fn supports_extension(&self, extension: &str) -> bool {
        matches!(extension, "txt" | "text" | "md" | "markdown")
    }
}
