//! Report export
//!
//! The downloadable artifact is flat text: one `"<CheckLabel>: <Verdict
//! text>"` line per check result, then a summary line for section presence.

use crate::processor::ProcessedSubmission;
use crate::types::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "article_compliance_report.txt";
pub const REPORT_MIME_TYPE: &str = "text/plain";
pub const JSON_REPORT_FILE_NAME: &str = "article_compliance_report.json";
pub const JSON_MIME_TYPE: &str = "application/json";

/// `Abstract Check: PASS: Abstract word count (150) is within the range 100-250.`
pub fn render_line(result: &CheckResult) -> String {
    format!("{}: {}", result.label(), result.verdict_text())
}

pub fn summary_line(report: &ComplianceReport) -> String {
    if report.missing_sections.is_empty() {
        "Summary: All essential sections appear to be present.".to_string()
    } else {
        format!(
            "Summary: Missing sections: {}",
            report.missing_sections.join(", ")
        )
    }
}

pub fn render_text(report: &ComplianceReport) -> String {
    let mut lines: Vec<String> = report.results.iter().map(render_line).collect();
    lines.push(summary_line(report));
    lines.join("\n")
}

/// A rendered report ready to hand to a download or write to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ReportArtifact {
    pub fn from_report(report: &ComplianceReport) -> Self {
        Self {
            file_name: REPORT_FILE_NAME.to_string(),
            mime_type: REPORT_MIME_TYPE,
            contents: render_text(report),
        }
    }

    /// Machine-readable export: report plus submission metadata.
    pub fn json(submission: &ProcessedSubmission) -> serde_json::Result<Self> {
        Ok(Self {
            file_name: JSON_REPORT_FILE_NAME.to_string(),
            mime_type: JSON_MIME_TYPE,
            contents: submission.to_json()?,
        })
    }

    /// Write into `dir` under the artifact's file name.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        self.write_to(&path)?;
        Ok(path)
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut contents = self.contents.clone();
        contents.push('\n');
        fs::write(path, contents)
    }
}
