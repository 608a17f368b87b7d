// Main rules module - delegates to semantic sub-modules
// This file coordinates the check system but actual implementations are in:
// - engine.rs: ComplianceCheck trait, StructureValidator and run_all
// - boundary.rs: Marker + terminator heuristics for locating sections
// - abstract_length.rs: Abstract word count
// - keywords.rs: Keyword count
// - sections.rs: Required section presence
// - ordering.rs: Optional section order check

pub mod abstract_length;
pub mod boundary;
pub mod engine;
pub mod keywords;
pub mod ordering;
pub mod sections;

pub use abstract_length::check_abstract;
pub use boundary::{BoundaryPattern, BoundaryStrategy, SectionLocator, Span};
pub use engine::*;
pub use keywords::check_keywords;
pub use sections::check_sections;
