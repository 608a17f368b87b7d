// Error taxonomy for the manuscript pipeline.
//
// Failed structural checks are NOT errors - they are Fail verdicts inside a
// ComplianceReport. The types here cover the conditions that stop the
// pipeline before any check runs.

use std::path::PathBuf;
use thiserror::Error;

/// A rule set that cannot be used. Detected at load time, never at check time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("rule set declares no required sections")]
    EmptySectionList,

    #[error("required section #{index} has a blank name")]
    BlankSectionName { index: usize },

    #[error("failed to read rule set from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule set YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
}

/// The extraction collaborator could not produce text from an upload.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type '{extension}'")]
    Unsupported { extension: String },

    #[error("file is not valid UTF-8 text: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("document is password-protected")]
    Encrypted,

    #[error("document is corrupted: {reason}")]
    Corrupted { reason: String },
}

impl ExtractionError {
    pub fn corrupted(reason: impl Into<String>) -> Self {
        Self::Corrupted {
            reason: reason.into(),
        }
    }

    /// Short machine-friendly reason code, surfaced alongside the message.
    pub fn reason(&self) -> &'static str {
        match self {
            ExtractionError::Unsupported { .. } => "unsupported",
            ExtractionError::InvalidEncoding(_) => "invalid_encoding",
            ExtractionError::Encrypted => "encrypted",
            ExtractionError::Corrupted { .. } => "corrupted",
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::UnsupportedArchive(msg)
                if msg.contains("crypt") || msg.contains("Password") =>
            {
                ExtractionError::Encrypted
            }
            other => ExtractionError::corrupted(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for ExtractionError {
    fn from(err: quick_xml::Error) -> Self {
        ExtractionError::corrupted(format!("malformed document XML: {err}"))
    }
}

/// Manuscript text that must not reach the validator.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("manuscript text is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

impl ValidationError {
    pub fn empty_text() -> Self {
        Self::InvalidInput {
            reason: "manuscript text is empty".to_string(),
        }
    }
}

/// Everything the submission pipeline can fail with.
#[derive(Debug, Error)]
pub enum ManuscriptError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T, E = ManuscriptError> = std::result::Result<T, E>;
