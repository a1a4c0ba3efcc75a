//! Program model shared by the analysis crates.
//!
//! This crate describes a compiled program the way the metadata engine needs to
//! see it: ordered source files, their top-level statements with spans, class
//! declarations with decorators, and decorator argument expressions. Parsing is
//! somebody else's job; see `angular_context_symbols::ngtsc::program` for the
//! oxc-backed frontend.

use std::fmt;

pub mod node;
pub mod program;

pub use node::*;
pub use program::*;

/// Byte range of a node inside its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// `true` when `offset` lies inside `[start, end)`.
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn contains_span(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_check_span_containment() {
        let outer = Span::new(10, 50);
        assert!(outer.contains(10));
        assert!(!outer.contains(50));
        assert!(outer.contains_span(Span::new(12, 20)));
        assert!(!outer.contains_span(Span::new(40, 60)));
        assert!(outer.overlaps(Span::new(40, 60)));
        assert_eq!(outer.merge(Span::new(0, 20)), Span::new(0, 50));
    }
}
