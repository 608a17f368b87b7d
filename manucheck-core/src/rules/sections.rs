use super::engine::ComplianceCheck;
use crate::types::*;
use regex::Regex;

// Presence is a substring match, not a heading check: a body sentence that
// mentions a section name satisfies it. Known false-positive risk.

/// Matcher for one required section name, tolerant of a "<digits>. " prefix.
#[derive(Debug, Clone)]
pub struct SectionMatcher {
    name: String,
    pattern: Regex,
}

impl SectionMatcher {
    pub fn new(name: &str) -> Self {
        let pattern = Regex::new(&format!(r"(?i)(?:\d+\.\s*)?{}", regex::escape(name)))
            .expect("escaped section name is always a valid pattern");
        Self {
            name: name.to_string(),
            pattern,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First occurrence as `(byte offset, matched text)`.
    pub fn find<'t>(&self, text: &'t str) -> Option<(usize, &'t str)> {
        self.pattern.find(text).map(|m| (m.start(), m.as_str()))
    }

    pub fn evaluate(&self, text: &str) -> CheckResult {
        let found = self.find(text);
        let rule_id = RuleId::SectionPresence {
            section: self.name.clone(),
        };

        match found {
            Some((offset, matched)) => CheckResult::new(
                rule_id,
                Verdict::Pass,
                Measurement::SectionMatch {
                    offset: Some(offset),
                    matched_text: Some(matched.to_string()),
                },
                format!("Section '{}' found.", self.name),
            ),
            None => CheckResult::new(
                rule_id,
                Verdict::Fail,
                Measurement::SectionMatch {
                    offset: None,
                    matched_text: None,
                },
                format!("Section '{}' not found.", self.name),
            ),
        }
    }
}

/// One presence result per required section, in declared order.
pub fn check_sections(text: &str, required: &[String]) -> Vec<CheckResult> {
    required
        .iter()
        .map(|name| SectionMatcher::new(name).evaluate(text))
        .collect()
}

/// Names of the sections whose presence check failed, in result order.
pub fn missing_sections(results: &[CheckResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.passed())
        .filter_map(|r| match &r.rule_id {
            RuleId::SectionPresence { section } => Some(section.clone()),
            _ => None,
        })
        .collect()
}

pub struct SectionPresenceCheck {
    matchers: Vec<SectionMatcher>,
}

impl SectionPresenceCheck {
    pub fn new(required: &[String]) -> Self {
        Self {
            matchers: required.iter().map(|name| SectionMatcher::new(name)).collect(),
        }
    }
}

impl ComplianceCheck for SectionPresenceCheck {
    fn evaluate(&self, text: &str) -> Vec<CheckResult> {
        self.matchers.iter().map(|m| m.evaluate(text)).collect()
    }

    fn name(&self) -> &str {
        "SectionPresence"
    }
}
