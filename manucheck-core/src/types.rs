use serde::{Deserialize, Serialize};
use std::fmt;

// ===== BOUNDS =====

/// Inclusive `[min, max]` range used by counting rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: usize) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// ===== CHECK RESULTS =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_pass(passed: bool) -> Self {
        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Which rule produced a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleId {
    AbstractWordCount,
    KeywordCount,
    SectionPresence { section: String },
    SectionOrder,
}

impl RuleId {
    /// Label used as the line prefix in exported reports.
    pub fn label(&self) -> String {
        match self {
            RuleId::AbstractWordCount => "Abstract Check".to_string(),
            RuleId::KeywordCount => "Keywords Check".to_string(),
            RuleId::SectionPresence { section } => {
                format!("Section Presence Check ({section})")
            }
            RuleId::SectionOrder => "Section Order Check".to_string(),
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleId::AbstractWordCount => f.write_str("abstract_word_count"),
            RuleId::KeywordCount => f.write_str("keyword_count"),
            RuleId::SectionPresence { section } => write!(f, "section_presence:{section}"),
            RuleId::SectionOrder => f.write_str("section_order"),
        }
    }
}

/// The value(s) a check measured. Kept structured so callers don't
/// have to parse messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measurement {
    /// The marker a check relies on was never located.
    MarkerNotFound { marker: String },
    WordCount {
        count: usize,
        bounds: Bounds,
        excerpt: String,
    },
    KeywordCount {
        count: usize,
        bounds: Bounds,
        keywords: Vec<String>,
    },
    SectionMatch {
        /// Byte offset of the first match, `None` when absent
        offset: Option<usize>,
        matched_text: Option<String>,
    },
    SectionSequence {
        /// Present sections in the order they appear in the manuscript
        observed: Vec<String>,
        out_of_place: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    pub rule_id: RuleId,
    pub verdict: Verdict,
    pub measurement: Measurement,
    pub message: String,
}

impl CheckResult {
    pub fn new(
        rule_id: RuleId,
        verdict: Verdict,
        measurement: Measurement,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id,
            verdict,
            measurement,
            message: message.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    pub fn label(&self) -> String {
        self.rule_id.label()
    }

    /// `PASS: <message>` / `FAIL: <message>`
    pub fn verdict_text(&self) -> String {
        format!("{}: {}", self.verdict, self.message)
    }
}

// ===== REPORT =====

/// Ordered results of one validation run plus derived summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplianceReport {
    pub template: String,
    pub results: Vec<CheckResult>,
    /// Required sections that were not found, in the rule set's declared order
    pub missing_sections: Vec<String>,
}

impl ComplianceReport {
    pub fn new(template: impl Into<String>, results: Vec<CheckResult>) -> Self {
        let missing_sections = crate::rules::sections::missing_sections(&results);
        Self {
            template: template.into(),
            results,
            missing_sections,
        }
    }

    pub fn failing_rules(&self) -> Vec<&RuleId> {
        self.results
            .iter()
            .filter(|r| !r.passed())
            .map(|r| &r.rule_id)
            .collect()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn is_compliant(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    pub fn result_for(&self, rule_id: &RuleId) -> Option<&CheckResult> {
        self.results.iter().find(|r| &r.rule_id == rule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, verdict: Verdict) -> CheckResult {
        CheckResult::new(
            RuleId::SectionPresence {
                section: name.to_string(),
            },
            verdict,
            Measurement::SectionMatch {
                offset: None,
                matched_text: None,
            },
            "",
        )
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::new(3, 6);
        assert!(!bounds.contains(2));
        assert!(bounds.contains(3));
        assert!(bounds.contains(6));
        assert!(!bounds.contains(7));
        assert_eq!(bounds.to_string(), "3-6");
    }

    #[test]
    fn test_report_collects_missing_sections_in_result_order() {
        let report = ComplianceReport::new(
            "fujece",
            vec![
                section("Introduction", Verdict::Fail),
                section("Results", Verdict::Pass),
                section("Acknowledgements", Verdict::Fail),
            ],
        );

        assert_eq!(report.missing_sections, vec!["Introduction", "Acknowledgements"]);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.passed_count(), 1);
        assert!(!report.is_compliant());
    }

    #[test]
    fn test_rule_labels() {
        assert_eq!(RuleId::AbstractWordCount.label(), "Abstract Check");
        assert_eq!(
            RuleId::SectionPresence {
                section: "Results".to_string()
            }
            .label(),
            "Section Presence Check (Results)"
        );
        assert_eq!(
            RuleId::SectionPresence {
                section: "Results".to_string()
            }
            .to_string(),
            "section_presence:Results"
        );
    }
}
