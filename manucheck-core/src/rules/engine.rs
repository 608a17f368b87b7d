use crate::config::{RuleSet, ValidatorConfig};
use crate::error::{ConfigError, ValidationError};
use crate::types::*;
use tracing::{debug, info};

use super::abstract_length::AbstractWordCountCheck;
use super::keywords::KeywordCountCheck;
use super::ordering::SectionOrderCheck;
use super::sections::SectionPresenceCheck;

/// One structural rule evaluated against the whole manuscript text.
///
/// Checks are independent: none reads another's output, and evaluating in
/// any order yields the same results.
pub trait ComplianceCheck: Send + Sync {
    fn evaluate(&self, text: &str) -> Vec<CheckResult>;

    fn name(&self) -> &str;
}

/// Runs every configured check against a manuscript and collects a report.
///
/// Stateless after construction, so one validator can serve concurrent
/// runs.
pub struct StructureValidator {
    rules: RuleSet,
    config: ValidatorConfig,
    checks: Vec<Box<dyn ComplianceCheck>>,
}

impl StructureValidator {
    pub fn new(rules: RuleSet) -> Result<Self, ConfigError> {
        Self::with_config(rules, ValidatorConfig::default())
    }

    pub fn with_config(rules: RuleSet, config: ValidatorConfig) -> Result<Self, ConfigError> {
        rules.validate()?;
        let checks = Self::build_pipeline(&rules, &config);
        debug!(
            template = %rules.name,
            checks = checks.len(),
            "structure validator ready"
        );
        Ok(Self {
            rules,
            config,
            checks,
        })
    }

    /// Pipeline order is the reporting order: abstract, keywords, sections,
    /// then any optional extras.
    fn build_pipeline(rules: &RuleSet, config: &ValidatorConfig) -> Vec<Box<dyn ComplianceCheck>> {
        let mut checks: Vec<Box<dyn ComplianceCheck>> = vec![
            Box::new(AbstractWordCountCheck::new(rules.abstract_words)),
            Box::new(KeywordCountCheck::new(rules.keywords)),
            Box::new(SectionPresenceCheck::new(&rules.required_sections)),
        ];
        if config.checks.section_order {
            checks.push(Box::new(SectionOrderCheck::new(&rules.required_sections)));
        }
        checks
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Reject text that must not reach the checks. Size limits are the
    /// caller's concern; see `ManuscriptProcessor`.
    pub fn ensure_checkable(&self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::empty_text());
        }
        Ok(())
    }

    /// Run every check. Individual failures become Fail verdicts; only
    /// unusable input is an error.
    pub fn run_all(&self, text: &str) -> Result<ComplianceReport, ValidationError> {
        self.ensure_checkable(text)?;

        let mut results = Vec::new();
        for check in &self.checks {
            let produced = check.evaluate(text);
            debug!(
                check = check.name(),
                results = produced.len(),
                failed = produced.iter().filter(|r| !r.passed()).count(),
                "check evaluated"
            );
            results.extend(produced);
        }

        let report = ComplianceReport::new(self.rules.name.clone(), results);
        info!(
            template = %report.template,
            passed = report.passed_count(),
            failed = report.failed_count(),
            "validation complete"
        );
        Ok(report)
    }
}

/// Validate `text` against `rules` with the default validator settings.
pub fn run_all(text: &str, rules: &RuleSet) -> Result<ComplianceReport, crate::error::ManuscriptError> {
    let validator = StructureValidator::new(rules.clone())?;
    Ok(validator.run_all(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ManuscriptError;

    fn fujece_manuscript() -> String {
        format!(
            "Title\n\nAbstract\n{}\nKeywords: ml, nlp, parsing, indexing\n1. Introduction\nText.\n\
             2. Results\nText.\nAcknowledgements\nThanks.\nAuthor Contribution Statement\nAll.\n\
             Ethics Committee Approval and Conflict of Interest\nNone.\n",
            "word ".repeat(150)
        )
    }

    #[test]
    fn test_compliant_manuscript() {
        let report = run_all(&fujece_manuscript(), &RuleSet::fujece()).unwrap();
        assert!(report.is_compliant(), "{report:#?}");
        assert_eq!(report.results.len(), 2 + 7);
        assert!(report.missing_sections.is_empty());
    }

    #[test]
    fn test_report_order_is_abstract_keywords_sections() {
        let report = run_all("nothing useful here", &RuleSet::fujece()).unwrap();
        assert_eq!(report.results[0].rule_id, RuleId::AbstractWordCount);
        assert_eq!(report.results[1].rule_id, RuleId::KeywordCount);
        assert!(report.results[2..]
            .iter()
            .all(|r| matches!(r.rule_id, RuleId::SectionPresence { .. })));
    }

    #[test]
    fn test_empty_text_is_invalid_input() {
        let err = run_all("  \n\t ", &RuleSet::fujece()).unwrap_err();
        assert!(matches!(
            err,
            ManuscriptError::Validation(ValidationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_malformed_rules_rejected_at_construction() {
        let mut rules = RuleSet::fujece();
        rules.abstract_words = Bounds::new(300, 100);
        assert!(StructureValidator::new(rules).is_err());
    }

    #[test]
    fn test_size_limit_not_enforced_by_validator() {
        let config = ValidatorConfig {
            max_input_bytes: 16,
            ..ValidatorConfig::default()
        };
        let validator = StructureValidator::with_config(RuleSet::fujece(), config).unwrap();
        let report = validator.run_all(&fujece_manuscript()).unwrap();
        assert!(report.is_compliant());
    }

    #[test]
    fn test_free_run_all_accepts_large_manuscript() {
        let mut text = fujece_manuscript();
        let filler = "Filler paragraph of body text.\n";
        text.push_str(&filler.repeat(6 * 1024 * 1024 / filler.len()));
        assert!(text.len() > ValidatorConfig::default().max_input_bytes);

        let report = run_all(&text, &RuleSet::fujece()).unwrap();
        assert!(report.is_compliant());
    }

    #[test]
    fn test_section_order_check_is_opt_in() {
        let default = StructureValidator::new(RuleSet::fujece()).unwrap();
        assert!(!default.check_names().contains(&"SectionOrder"));

        let mut config = ValidatorConfig::default();
        config.checks.section_order = true;
        let validator = StructureValidator::with_config(RuleSet::fujece(), config).unwrap();
        let report = validator.run_all(&fujece_manuscript()).unwrap();
        assert_eq!(report.results.last().unwrap().rule_id, RuleId::SectionOrder);
        assert_eq!(report.results.len(), 2 + 7 + 1);
    }

    #[test]
    fn test_validator_is_shareable_across_threads() {
        let validator = std::sync::Arc::new(StructureValidator::new(RuleSet::fujece()).unwrap());
        let text = std::sync::Arc::new(fujece_manuscript());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let validator = validator.clone();
                let text = text.clone();
                std::thread::spawn(move || validator.run_all(&text).unwrap())
            })
            .collect();
        let reports: Vec<ComplianceReport> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(reports.windows(2).all(|w| w[0] == w[1]));
    }
}
