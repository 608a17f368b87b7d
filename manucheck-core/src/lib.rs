// Manucheck Core Library
//
// Structural compliance checks for journal manuscript submissions.
// Extracts text from an upload, runs the template's checks, and renders a
// report.

pub mod config;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod report;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{RuleSet, TemplateRegistry, ValidatorConfig, DEFAULT_TEMPLATE};
pub use error::{ConfigError, ExtractionError, ManuscriptError, ValidationError};
pub use preprocessors::{extract_text, DocumentFormat, Preprocessor};
pub use processor::{ManuscriptProcessor, ProcessedSubmission, SubmissionMetadata};
pub use report::{render_text, ReportArtifact};
pub use rules::{run_all, ComplianceCheck, StructureValidator};
pub use types::*;
