//! PDF Preprocessor
//!
//! Extracts text page by page with `lopdf` and joins pages with line
//! breaks. A page that yields no text (scanned image, unsupported font
//! encoding) contributes an empty segment instead of failing the whole
//! document.

use crate::error::ExtractionError;
use crate::preprocessors::traits::Preprocessor;
use lopdf::Document;
use tracing::{debug, warn};

pub struct PdfPreprocessor;

impl PdfPreprocessor {
    pub fn new() -> Self {
        Self
    }

    fn load(bytes: &[u8]) -> Result<Document, ExtractionError> {
        let document = Document::load_mem(bytes).map_err(|err| {
            let reason = err.to_string();
            if reason.to_lowercase().contains("decrypt") || reason.to_lowercase().contains("password")
            {
                ExtractionError::Encrypted
            } else {
                ExtractionError::corrupted(reason)
            }
        })?;

        if document.is_encrypted() {
            return Err(ExtractionError::Encrypted);
        }
        Ok(document)
    }

    /// Text of each page in page order. Pages that fail to decode are empty.
    pub fn page_texts(document: &Document) -> Vec<String> {
        document
            .get_pages()
            .keys()
            .map(|&page_number| match document.extract_text(&[page_number]) {
                Ok(text) => text.trim_end().to_string(),
                Err(err) => {
                    warn!(page = page_number, error = %err, "page yielded no extractable text");
                    String::new()
                }
            })
            .collect()
    }
}

impl Default for PdfPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for PdfPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let document = Self::load(bytes)?;
        let pages = Self::page_texts(&document);
        debug!(
            pages = pages.len(),
            empty_pages = pages.iter().filter(|p| p.is_empty()).count(),
            "pdf pages extracted"
        );
        Ok(pages.join("\n"))
    }

    fn name(&self) -> &str {
        "PdfPreprocessor"
    }

    fn supports_extension(&self, extension: &str) -> bool {
        extension == "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF whose pages each show one line of text; `None` gives a
    /// page without a content stream.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };
            if let Some(line) = page {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page_dict.set("Contents", content_id);
            }
            kids.push(doc.add_object(page_dict).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_joined_in_order() {
        let bytes = build_pdf(&[Some("Abstract"), Some("Results")]);
        let text = PdfPreprocessor::new().extract_text(&bytes).unwrap();
        let abstract_at = text.find("Abstract").expect("page 1 text");
        let results_at = text.find("Results").expect("page 2 text");
        assert!(abstract_at < results_at);
    }

    #[test]
    fn test_blank_page_contributes_empty_segment() {
        let bytes = build_pdf(&[Some("Abstract"), None, Some("Results")]);
        let document = Document::load_mem(&bytes).unwrap();
        let pages = PdfPreprocessor::page_texts(&document);
        assert_eq!(pages.len(), 3);
        assert!(pages[1].is_empty());
        assert!(pages[2].contains("Results"));
    }

    #[test]
    fn test_garbage_is_corrupted() {
        let err = PdfPreprocessor::new()
            .extract_text(b"%PDF-1.5 definitely not a pdf")
            .unwrap_err();
        assert_eq!(err.reason(), "corrupted");
    }
}
