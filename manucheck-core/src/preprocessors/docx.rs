//! Word-processor (.docx) preprocessor
//!
//! A .docx file is a zip package; the body lives in `word/document.xml`
//! as WordprocessingML. Text is the concatenation of `<w:t>` runs, one
//! output line per `<w:p>` paragraph.

use super::traits::Preprocessor;
use crate::error::ExtractionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

/// Signature of an OLE compound file. Office wraps encrypted OOXML
/// packages in one, so a "docx" starting with it is password-protected.
const COMPOUND_FILE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

pub struct DocxPreprocessor;

impl DocxPreprocessor {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|err| match err {
            zip::result::ZipError::FileNotFound => {
                ExtractionError::corrupted(format!("package has no {DOCUMENT_PART}"))
            }
            other => other.into(),
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|err| ExtractionError::corrupted(format!("unreadable {DOCUMENT_PART}: {err}")))?;
        Ok(xml)
    }
}

impl Default for DocxPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect paragraph text from WordprocessingML.
pub fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    // <w:tab> inside <w:tabs> declares a tab stop, not a tab character
    let mut in_tab_stops = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"tabs" => in_tab_stops = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"tabs" => in_tab_stops = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Text(text) if in_text_run => current.push_str(&text.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

impl Preprocessor for DocxPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.starts_with(&COMPOUND_FILE_MAGIC) {
            return Err(ExtractionError::Encrypted);
        }

        let xml = Self::read_document_part(bytes)?;
        let paragraphs = paragraphs_from_document_xml(&xml)?;
        tracing::debug!(paragraphs = paragraphs.len(), "docx paragraphs extracted");
        Ok(paragraphs.join("\n"))
    }

    fn name(&self) -> &str {
        "DocxPreprocessor"
    }

    fn supports_extension(&self, extension: &str) -> bool {
        extension == "docx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = zip::write::FileOptions::default();
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.start_file(DOCUMENT_PART, options).unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_paragraphs_joined_with_line_breaks() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>Abstract</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">We </w:t></w:r><w:r><w:t>study &amp; test.</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>Keywords: a, b</w:t></w:r></w:p>",
        );
        let text = DocxPreprocessor::new().extract_text(&build_docx(&xml)).unwrap();
        assert_eq!(text, "Abstract\nWe study & test.\n\nKeywords: a, b");
    }

    #[test]
    fn test_tabs_and_breaks_inside_runs() {
        let xml = wrap_body(
            "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
             <w:r><w:t>1.</w:t><w:tab/><w:t>Introduction</w:t><w:br/><w:t>Next</w:t></w:r></w:p>",
        );
        let paragraphs = paragraphs_from_document_xml(&xml).unwrap();
        assert_eq!(paragraphs, vec!["1.\tIntroduction\nNext"]);
    }

    #[test]
    fn test_not_a_zip_is_corrupted() {
        let err = DocxPreprocessor::new().extract_text(b"plain bytes").unwrap_err();
        assert_eq!(err.reason(), "corrupted");
    }

    #[test]
    fn test_package_without_document_part() {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            zip.start_file("other.xml", zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = DocxPreprocessor::new().extract_text(&buffer).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_compound_file_is_encrypted() {
        let mut bytes = COMPOUND_FILE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        let err = DocxPreprocessor::new().extract_text(&bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Encrypted));
    }
}
