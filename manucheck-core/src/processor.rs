use crate::config::{RuleSet, ValidatorConfig};
use crate::error::{ConfigError, ManuscriptError, Result, ValidationError};
use crate::preprocessors::DocumentFormat;
use crate::rules::StructureValidator;
use crate::types::ComplianceReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        debug!(step = step_name, elapsed_ms = elapsed.as_millis() as u64, "step finished");
        self.timings.push((step_name.to_string(), elapsed));

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            info!(
                step = %step,
                elapsed_ms = duration.as_millis() as u64,
                share_pct = (percentage * 10.0).round() / 10.0,
                "step timing"
            );
        }
        info!(total_ms = total.as_millis() as u64, "pipeline timing");
    }
}

/// Provenance of one validation run. The digest identifies the checked text
/// without retaining it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionMetadata {
    pub run_id: Uuid,
    pub source: Option<String>,
    pub format: Option<DocumentFormat>,
    pub text_bytes: usize,
    pub word_count: usize,
    pub text_sha256: String,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedSubmission {
    pub report: ComplianceReport,
    pub metadata: SubmissionMetadata,
}

impl ProcessedSubmission {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn calculate_text_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extract, gate, and validate one manuscript upload.
pub struct ManuscriptProcessor {
    validator: StructureValidator,
    profiling: bool,
}

impl ManuscriptProcessor {
    pub fn new(validator: StructureValidator) -> Self {
        Self {
            validator,
            profiling: false,
        }
    }

    pub fn from_rules(rules: RuleSet) -> Result<Self, ConfigError> {
        Ok(Self::new(StructureValidator::new(rules)?))
    }

    pub fn with_config(rules: RuleSet, config: ValidatorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(StructureValidator::with_config(rules, config)?))
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }

    pub fn validator(&self) -> &StructureValidator {
        &self.validator
    }

    /// Run the full pipeline on raw upload bytes. Extraction failures stop
    /// before any check runs.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        declared_extension: &str,
        source: Option<&str>,
    ) -> Result<ProcessedSubmission> {
        let mut profiler = StepProfiler::new(self.profiling);

        let format = DocumentFormat::from_extension(declared_extension)?;
        info!(
            source = source.unwrap_or("<memory>"),
            format = %format,
            bytes = bytes.len(),
            "processing manuscript"
        );

        let text = profiler.time_step("Text extraction", || {
            format.preprocessor().extract_text(bytes)
        })?;

        let submission = profiler.time_step("Structure validation", || {
            self.validate(&text, source, Some(format))
        })?;

        profiler.log_summary();
        Ok(submission)
    }

    /// Validate text that is already extracted.
    pub fn process_text(&self, text: &str, source: Option<&str>) -> Result<ProcessedSubmission> {
        self.validate(text, source, None)
    }

    fn validate(
        &self,
        text: &str,
        source: Option<&str>,
        format: Option<DocumentFormat>,
    ) -> Result<ProcessedSubmission> {
        let limit = self.validator.config().max_input_bytes;
        if text.len() > limit {
            return Err(ValidationError::TooLarge {
                size: text.len(),
                limit,
            }
            .into());
        }

        let report = self.validator.run_all(text).map_err(ManuscriptError::from)?;
        let metadata = SubmissionMetadata {
            run_id: Uuid::new_v4(),
            source: source.map(str::to_string),
            format,
            text_bytes: text.len(),
            word_count: text.split_whitespace().count(),
            text_sha256: calculate_text_hash(text),
            checked_at: Utc::now(),
        };

        info!(
            run_id = %metadata.run_id,
            template = %report.template,
            passed = report.passed_count(),
            failed = report.failed_count(),
            "manuscript checked"
        );

        Ok(ProcessedSubmission { report, metadata })
    }
}
