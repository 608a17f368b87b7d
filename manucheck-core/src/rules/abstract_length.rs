use super::boundary::SectionLocator;
use super::engine::ComplianceCheck;
use crate::types::*;
use std::sync::LazyLock;

static DEFAULT_LOCATOR: LazyLock<SectionLocator> = LazyLock::new(SectionLocator::abstract_default);

/// Characters of abstract text quoted in a failure message
const EXCERPT_CHARS: usize = 100;

/// Abstract word count against the default boundary heuristics.
pub fn check_abstract(text: &str, bounds: Bounds) -> CheckResult {
    check_abstract_with(text, bounds, &DEFAULT_LOCATOR)
}

pub fn check_abstract_with(text: &str, bounds: Bounds, locator: &SectionLocator) -> CheckResult {
    let Some(span) = locator.locate(text) else {
        return CheckResult::new(
            RuleId::AbstractWordCount,
            Verdict::Fail,
            Measurement::MarkerNotFound {
                marker: locator.marker_label().to_string(),
            },
            "Abstract section not clearly identified or missing.",
        );
    };

    let content = span.text.trim();
    let count = content.split_whitespace().count();
    let excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
    let verdict = Verdict::from_pass(bounds.contains(count));

    let message = match verdict {
        Verdict::Pass => format!(
            "Abstract word count ({count}) is within the range {bounds}."
        ),
        Verdict::Fail => format!(
            "Abstract word count ({count}) is outside the range {bounds}. Abstract content found: '{excerpt}...'"
        ),
    };

    CheckResult::new(
        RuleId::AbstractWordCount,
        verdict,
        Measurement::WordCount {
            count,
            bounds,
            excerpt,
        },
        message,
    )
}

pub struct AbstractWordCountCheck {
    bounds: Bounds,
    locator: SectionLocator,
}

impl AbstractWordCountCheck {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_locator(bounds, SectionLocator::abstract_default())
    }

    pub fn with_locator(bounds: Bounds, locator: SectionLocator) -> Self {
        Self { bounds, locator }
    }
}

impl ComplianceCheck for AbstractWordCountCheck {
    fn evaluate(&self, text: &str) -> Vec<CheckResult> {
        vec![check_abstract_with(text, self.bounds, &self.locator)]
    }

    fn name(&self) -> &str {
        "AbstractWordCount"
    }
}
