// Boundary detection for logical sections in unstructured text.
//
// A section is located by a start marker and ends at the earliest of an
// ordered list of candidate terminators. The heuristic favors the nearest
// plausible terminator; swapping in a stricter strategy does not change
// the check contracts built on top of it.

use regex::Regex;
use std::sync::LazyLock;

static ABSTRACT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Abstract").unwrap());

static KEYWORDS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Keywords:").unwrap());

static KEYWORDS_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Keywords").unwrap());

/// "1. Introduction", "2.Introduction" - a numbered introduction heading
static NUMBERED_INTRODUCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\.\s*Introduction").unwrap());

/// Two consecutive blank lines (three line breaks, only whitespace between)
static DOUBLE_BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

/// A single blank line
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// One candidate end-of-section pattern.
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl BoundaryPattern {
    pub fn new(name: &'static str, regex: Regex) -> Self {
        Self { name, regex }
    }
}

/// Ordered terminator candidates. The earliest match in the text wins;
/// when two candidates match at the same offset the one listed first wins.
#[derive(Debug, Clone)]
pub struct BoundaryStrategy {
    candidates: Vec<BoundaryPattern>,
}

/// Where a boundary was found, relative to the searched haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub offset: usize,
    pub terminator: &'static str,
}

impl BoundaryStrategy {
    pub fn new(candidates: Vec<BoundaryPattern>) -> Self {
        Self { candidates }
    }

    /// Abstract ends at "Keywords", a numbered Introduction heading, or two
    /// blank lines.
    pub fn abstract_default() -> Self {
        Self::new(vec![
            BoundaryPattern::new("keywords", KEYWORDS_TERMINATOR.clone()),
            BoundaryPattern::new("numbered_introduction", NUMBERED_INTRODUCTION.clone()),
            BoundaryPattern::new("double_blank_line", DOUBLE_BLANK_LINE.clone()),
        ])
    }

    /// Keywords end at a numbered Introduction heading or a blank line.
    pub fn keywords_default() -> Self {
        Self::new(vec![
            BoundaryPattern::new("numbered_introduction", NUMBERED_INTRODUCTION.clone()),
            BoundaryPattern::new("blank_line", BLANK_LINE.clone()),
        ])
    }

    /// Earliest terminator in `haystack`, if any candidate matches.
    pub fn find(&self, haystack: &str) -> Option<Boundary> {
        self.candidates
            .iter()
            .enumerate()
            .filter_map(|(rank, candidate)| {
                candidate
                    .regex
                    .find(haystack)
                    .map(|m| (m.start(), rank, candidate.name))
            })
            .min_by_key(|(offset, rank, _)| (*offset, *rank))
            .map(|(offset, _, terminator)| Boundary { offset, terminator })
    }
}

/// A located slice of the manuscript. Offsets are byte offsets into the
/// full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
    pub terminator: &'static str,
}

/// Start marker plus boundary strategy.
#[derive(Debug, Clone)]
pub struct SectionLocator {
    marker_label: &'static str,
    marker: Regex,
    strategy: BoundaryStrategy,
}

impl SectionLocator {
    pub fn new(marker_label: &'static str, marker: Regex, strategy: BoundaryStrategy) -> Self {
        Self {
            marker_label,
            marker,
            strategy,
        }
    }

    pub fn abstract_default() -> Self {
        Self::new(
            "Abstract",
            ABSTRACT_MARKER.clone(),
            BoundaryStrategy::abstract_default(),
        )
    }

    pub fn keywords_default() -> Self {
        Self::new(
            "Keywords:",
            KEYWORDS_MARKER.clone(),
            BoundaryStrategy::keywords_default(),
        )
    }

    pub fn marker_label(&self) -> &'static str {
        self.marker_label
    }

    /// Capture the text between the first marker occurrence and the
    /// earliest terminator after it. Whitespace right after the marker is
    /// skipped, so a heading followed by blank lines still captures the
    /// paragraph below it. Only when nothing terminates the content does a
    /// terminator inside that whitespace run count, giving an empty capture.
    /// `None` when the marker is absent or nothing terminates the section.
    pub fn locate<'t>(&self, text: &'t str) -> Option<Span<'t>> {
        let marker = self.marker.find(text)?;
        let after_marker = &text[marker.end()..];
        let content_start = marker.end() + (after_marker.len() - after_marker.trim_start().len());

        let (start, boundary) = match self.strategy.find(&text[content_start..]) {
            Some(boundary) => (content_start, boundary),
            None => (marker.end(), self.strategy.find(after_marker)?),
        };
        let end = start + boundary.offset;

        Some(Span {
            start,
            end,
            text: &text[start..end],
            terminator: boundary.terminator,
        })
    }
}
