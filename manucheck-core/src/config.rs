use crate::error::ConfigError;
use crate::types::Bounds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the built-in template used when none is requested.
pub const DEFAULT_TEMPLATE: &str = "fujece";

// Default value functions for serde
fn default_version() -> String {
    "1".to_string()
}

fn default_max_input_bytes() -> usize {
    5 * 1024 * 1024
}

/// Structural requirements of one journal template.
///
/// Immutable once loaded: build it with [`RuleSet::fujece`],
/// [`RuleSet::load_from_file`] or deserialize and call [`RuleSet::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    /// Short identifier, e.g. "fujece"
    pub name: String,
    /// Human-readable journal title
    #[serde(default)]
    pub journal: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Allowed abstract length in words (inclusive)
    pub abstract_words: Bounds,
    /// Allowed number of keywords (inclusive)
    pub keywords: Bounds,
    /// Required sections in their expected order
    pub required_sections: Vec<String>,
    /// Typographic requirements. Reported to authors, never checked.
    #[serde(default)]
    pub formatting: FormattingGuidelines,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattingGuidelines {
    pub main_font: String,
    /// Body text size in points
    pub main_font_size: f32,
    pub title_font_size: f32,
    pub heading_font_size: f32,
    pub line_spacing: String,
    pub margins_mm: PageMargins,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageMargins {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for FormattingGuidelines {
    fn default() -> Self {
        Self {
            main_font: "Times New Roman".to_string(),
            main_font_size: 11.0,
            title_font_size: 12.0,
            heading_font_size: 12.0,
            line_spacing: "single".to_string(),
            margins_mm: PageMargins {
                top: 30.0,
                left: 15.0,
                right: 15.0,
                bottom: 25.0,
            },
        }
    }
}

impl FormattingGuidelines {
    /// One line per guideline, for display next to a report.
    pub fn advisory_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Main text: {} {}pt, {} line spacing",
                self.main_font, self.main_font_size, self.line_spacing
            ),
            format!(
                "Title: {}pt, headings: {}pt",
                self.title_font_size, self.heading_font_size
            ),
            format!(
                "Page margins (mm): top {}, left {}, right {}, bottom {}",
                self.margins_mm.top,
                self.margins_mm.left,
                self.margins_mm.right,
                self.margins_mm.bottom
            ),
        ]
    }
}

impl RuleSet {
    /// Firat University Journal of Experimental and Computational Engineering
    pub fn fujece() -> Self {
        Self {
            name: DEFAULT_TEMPLATE.to_string(),
            journal: "Firat University Journal of Experimental and Computational Engineering"
                .to_string(),
            version: default_version(),
            abstract_words: Bounds::new(100, 250),
            keywords: Bounds::new(3, 6),
            required_sections: vec![
                "Abstract".to_string(),
                "Keywords".to_string(),
                "Introduction".to_string(),
                "Results".to_string(),
                "Acknowledgements".to_string(),
                "Author Contribution Statement".to_string(),
                "Ethics Committee Approval and Conflict of Interest".to_string(),
            ],
            formatting: FormattingGuidelines::default(),
        }
    }

    /// Check the invariants every rule set must hold before any manuscript
    /// is accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.abstract_words.is_inverted() {
            return Err(ConfigError::InvertedRange {
                field: "abstract_words",
                min: self.abstract_words.min,
                max: self.abstract_words.max,
            });
        }
        if self.keywords.is_inverted() {
            return Err(ConfigError::InvertedRange {
                field: "keywords",
                min: self.keywords.min,
                max: self.keywords.max,
            });
        }
        if self.required_sections.is_empty() {
            return Err(ConfigError::EmptySectionList);
        }
        if let Some(index) = self
            .required_sections
            .iter()
            .position(|s| s.trim().is_empty())
        {
            return Err(ConfigError::BlankSectionName { index });
        }
        Ok(())
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let rules: RuleSet = serde_yaml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate a rule set from a YAML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load from file when a path is given, otherwise the built-in default.
    ///
    /// A file that fails to load is an error: a broken template must stop
    /// the run rather than silently checking against different rules.
    pub fn load_with_fallback(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => load_rules(),
        }
    }
}

/// Load the default rule set.
pub fn load_rules() -> Result<RuleSet, ConfigError> {
    let rules = RuleSet::fujece();
    rules.validate()?;
    Ok(rules)
}

/// Per-run validator knobs, independent of the journal template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatorConfig {
    /// Manuscripts larger than this are rejected before any check runs
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
    #[serde(default)]
    pub checks: ChecksConfig,
}

/// Optional extra checks. Abstract, keyword and section presence checks
/// always run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChecksConfig {
    /// Verify that present sections appear in the declared order
    #[serde(default)]
    pub section_order: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            checks: ChecksConfig::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Named journal templates: the built-ins plus any loaded from disk.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, RuleSet>,
}

impl TemplateRegistry {
    pub fn new() -> Result<Self, ConfigError> {
        let mut registry = Self {
            templates: HashMap::new(),
        };
        registry.load_builtin_templates()?;
        Ok(registry)
    }

    fn load_builtin_templates(&mut self) -> Result<(), ConfigError> {
        self.register(RuleSet::fujece())
    }

    /// Add a template, replacing any with the same name.
    pub fn register(&mut self, rules: RuleSet) -> Result<(), ConfigError> {
        rules.validate()?;
        self.templates.insert(rules.name.clone(), rules);
        Ok(())
    }

    pub fn load_template_from_file(&mut self, path: impl AsRef<Path>) -> Result<&RuleSet, ConfigError> {
        let rules = RuleSet::load_from_file(path)?;
        let name = rules.name.clone();
        self.templates.insert(name.clone(), rules);
        self.get(&name)
    }

    pub fn get(&self, name: &str) -> Result<&RuleSet, ConfigError> {
        self.templates
            .get(&name.to_lowercase())
            .or_else(|| self.templates.get(name))
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }

    /// Template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_fujece() {
        let rules = load_rules().unwrap();
        assert_eq!(rules.name, "fujece");
        assert_eq!(rules.abstract_words, Bounds::new(100, 250));
        assert_eq!(rules.keywords, Bounds::new(3, 6));
        assert_eq!(rules.required_sections.len(), 7);
        assert_eq!(rules.required_sections[0], "Abstract");
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut rules = RuleSet::fujece();
        rules.keywords = Bounds::new(6, 3);
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::InvertedRange { field: "keywords", .. })
        ));
    }

    #[test]
    fn test_empty_sections_rejected() {
        let mut rules = RuleSet::fujece();
        rules.required_sections.clear();
        assert!(matches!(rules.validate(), Err(ConfigError::EmptySectionList)));
    }

    #[test]
    fn test_blank_section_name_rejected() {
        let mut rules = RuleSet::fujece();
        rules.required_sections.push("   ".to_string());
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::BlankSectionName { index: 7 })
        ));
    }

    #[test]
    fn test_yaml_template_without_formatting_uses_defaults() {
        let yaml = r#"
name: short-letters
abstract_words: { min: 50, max: 150 }
keywords: { min: 2, max: 5 }
required_sections:
  - Abstract
  - Methods
"#;
        let rules = RuleSet::from_yaml(yaml).unwrap();
        assert_eq!(rules.name, "short-letters");
        assert_eq!(rules.version, "1");
        assert_eq!(rules.formatting, FormattingGuidelines::default());
        assert_eq!(rules.required_sections, vec!["Abstract", "Methods"]);
    }

    #[test]
    fn test_yaml_negative_bound_is_parse_error() {
        let yaml = r#"
name: broken
abstract_words: { min: -1, max: 150 }
keywords: { min: 2, max: 5 }
required_sections: [Abstract]
"#;
        assert!(matches!(RuleSet::from_yaml(yaml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_builtin_template_survives_yaml() {
        let yaml = serde_yaml::to_string(&RuleSet::fujece()).unwrap();
        let rules = RuleSet::from_yaml(&yaml).unwrap();
        assert_eq!(rules, RuleSet::fujece());
    }

    #[test]
    fn test_registry_lookup() {
        let registry = TemplateRegistry::new().unwrap();
        assert_eq!(registry.names(), vec!["fujece"]);
        assert!(registry.get("FUJECE").is_ok());
        assert!(matches!(
            registry.get("nature"),
            Err(ConfigError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RuleSet::load_with_fallback(Some(Path::new("/nonexistent/rules.yaml")));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_validator_config_defaults() {
        let config: ValidatorConfig = serde_yaml::from_str("checks: { section_order: true }").unwrap();
        assert_eq!(config.max_input_bytes, 5 * 1024 * 1024);
        assert!(config.checks.section_order);
    }
}
