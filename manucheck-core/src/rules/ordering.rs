use super::engine::ComplianceCheck;
use super::sections::SectionMatcher;
use crate::types::*;

// SectionOrderCheck - optional check that present sections appear in the
// declared order. Uses the first occurrence of each name, so it inherits
// the presence check's substring weakness. Missing sections are ignored;
// the presence check already reports them.
pub struct SectionOrderCheck {
    matchers: Vec<SectionMatcher>,
}

impl SectionOrderCheck {
    pub fn new(required: &[String]) -> Self {
        Self {
            matchers: required.iter().map(|name| SectionMatcher::new(name)).collect(),
        }
    }

    pub fn check(&self, text: &str) -> CheckResult {
        let located: Vec<(&str, usize)> = self
            .matchers
            .iter()
            .filter_map(|m| m.find(text).map(|(offset, _)| (m.name(), offset)))
            .collect();

        // Walk in declared order; anything that starts before a section
        // declared ahead of it is out of place.
        let mut furthest = 0usize;
        let mut out_of_place = Vec::new();
        for (name, offset) in &located {
            if *offset < furthest {
                out_of_place.push(name.to_string());
            } else {
                furthest = *offset;
            }
        }

        let mut observed = located.clone();
        observed.sort_by_key(|(_, offset)| *offset);
        let observed: Vec<String> = observed.into_iter().map(|(n, _)| n.to_string()).collect();

        let verdict = Verdict::from_pass(out_of_place.is_empty());
        let message = match verdict {
            Verdict::Pass => format!(
                "Sections appear in the expected order ({} of {} located).",
                located.len(),
                self.matchers.len()
            ),
            Verdict::Fail => format!(
                "Sections out of expected order: {}. Observed order: {}",
                out_of_place.join(", "),
                observed.join(" > ")
            ),
        };

        CheckResult::new(
            RuleId::SectionOrder,
            verdict,
            Measurement::SectionSequence {
                observed,
                out_of_place,
            },
            message,
        )
    }
}

impl ComplianceCheck for SectionOrderCheck {
    fn evaluate(&self, text: &str) -> Vec<CheckResult> {
        vec![self.check(text)]
    }

    fn name(&self) -> &str {
        "SectionOrder"
    }
}
