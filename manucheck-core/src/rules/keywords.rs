use super::boundary::SectionLocator;
use super::engine::ComplianceCheck;
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;

static DEFAULT_LOCATOR: LazyLock<SectionLocator> = LazyLock::new(SectionLocator::keywords_default);

/// Runs of commas, semicolons and line breaks separate keywords
static KEYWORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;\r\n]+").unwrap());

/// Split a captured keyword block into trimmed, non-empty keywords.
pub fn split_keywords(block: &str) -> Vec<String> {
    KEYWORD_SEPARATOR
        .split(block.trim())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keyword count against the default boundary heuristics.
pub fn check_keywords(text: &str, bounds: Bounds) -> CheckResult {
    check_keywords_with(text, bounds, &DEFAULT_LOCATOR)
}

pub fn check_keywords_with(text: &str, bounds: Bounds, locator: &SectionLocator) -> CheckResult {
    let Some(span) = locator.locate(text) else {
        return CheckResult::new(
            RuleId::KeywordCount,
            Verdict::Fail,
            Measurement::MarkerNotFound {
                marker: locator.marker_label().to_string(),
            },
            "Keywords section not clearly identified or missing.",
        );
    };

    let keywords = split_keywords(span.text);
    let count = keywords.len();
    let verdict = Verdict::from_pass(bounds.contains(count));
    let listed = format_keyword_list(&keywords);

    let message = match verdict {
        Verdict::Pass => format!(
            "Number of keywords ({count}) is within the range {bounds}. Keywords: {listed}"
        ),
        Verdict::Fail => format!(
            "Number of keywords ({count}) is outside the range {bounds}. Keywords: {listed}"
        ),
    };

    CheckResult::new(
        RuleId::KeywordCount,
        verdict,
        Measurement::KeywordCount {
            count,
            bounds,
            keywords,
        },
        message,
    )
}

/// `['a', 'b', 'c']`
fn format_keyword_list(keywords: &[String]) -> String {
    let quoted: Vec<String> = keywords.iter().map(|k| format!("'{k}'")).collect();
    format!("[{}]", quoted.join(", "))
}

pub struct KeywordCountCheck {
    bounds: Bounds,
    locator: SectionLocator,
}

impl KeywordCountCheck {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_locator(bounds, SectionLocator::keywords_default())
    }

    pub fn with_locator(bounds: Bounds, locator: SectionLocator) -> Self {
        Self { bounds, locator }
    }
}

impl ComplianceCheck for KeywordCountCheck {
    fn evaluate(&self, text: &str) -> Vec<CheckResult> {
        vec![check_keywords_with(text, self.bounds, &self.locator)]
    }

    fn name(&self) -> &str {
        "KeywordCount"
    }
}
