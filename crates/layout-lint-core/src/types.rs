//! Core types for lint violations, edits and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a location covering a syntax node.
    ///
    /// Node columns are 0-indexed, location columns are 1-indexed.
    #[must_use]
    pub fn from_node(file: PathBuf, node: &crate::Node) -> Self {
        let start = node.range.start;
        Self::new(file, start.line, start.column + 1).with_span(start.offset, node.range.len())
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A single text replacement expressed in byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    /// Byte offset where the replaced text starts.
    pub offset: usize,
    /// Number of bytes replaced.
    pub length: usize,
    /// Replacement text.
    pub new_text: String,
}

impl TextEdit {
    /// Creates a new replacement.
    #[must_use]
    pub fn new(offset: usize, length: usize, new_text: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            new_text: new_text.into(),
        }
    }

    /// Inserts text at an offset.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    /// Deletes a byte range.
    #[must_use]
    pub fn delete(offset: usize, length: usize) -> Self {
        Self::new(offset, length, "")
    }

    /// Byte offset one past the replaced text.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Returns true if this edit and `other` touch overlapping bytes.
    ///
    /// Two insertions at the same offset overlap, since their order would be ambiguous.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.offset == other.offset {
            return true;
        }
        self.offset < other.end() && other.offset < self.end()
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Automatic edits, empty when the fix must be applied by hand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<TextEdit>,
}

impl Suggestion {
    /// Creates a new suggestion without automatic fix.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            edits: Vec::new(),
        }
    }

    /// Creates a new suggestion with automatic edits.
    #[must_use]
    pub fn with_edits(message: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            message: message.into(),
            edits,
        }
    }

    /// Returns true if the suggestion can be applied automatically.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "LL001").
    pub code: String,
    /// Rule name (e.g., "indentation-consistency").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Automatic edits attached to this violation, if any.
    #[must_use]
    pub fn edits(&self) -> &[TextEdit] {
        match &self.suggestion {
            Some(suggestion) => &suggestion.edits,
            None => &[],
        }
    }

    /// Returns true if this violation carries an automatic fix.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        !self.edits().is_empty()
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let fixable = if suggestion.is_fixable() {
                " [fixable]"
            } else {
                ""
            };
            let _ = writeln!(output, "  = help: {}{fixable}", suggestion.message);
        }
        for label in &self.labels {
            let _ = writeln!(
                output,
                "  = note: {} ({}:{})",
                label.message, label.location.line, label.location.column
            );
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files rewritten by autocorrection.
    #[serde(default)]
    pub files_fixed: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity: Severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Counts violations that carry an automatic fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fixable()).count()
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Sorts violations by file, then line, then column.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_fixed += other.files_fixed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "LL001",
            "indentation-consistency",
            severity,
            Location::new(PathBuf::from("app/models/user.rb"), 3, 4),
            "Inconsistent indentation detected.",
        )
    }

    #[test]
    fn violation_display_is_one_line() {
        let v = make_violation(Severity::Warning);
        insta::assert_snapshot!(
            v.to_string(),
            @"app/models/user.rb:3:4: warning [LL001] Inconsistent indentation detected."
        );
    }

    #[test]
    fn violation_format_marks_fixable_suggestion() {
        let v = make_violation(Severity::Warning).with_suggestion(Suggestion::with_edits(
            "Align with the first statement",
            vec![TextEdit::delete(10, 1)],
        ));
        let formatted = v.format();
        assert!(formatted.contains("= help: Align with the first statement [fixable]"));
        assert!(v.is_fixable());
    }

    #[test]
    fn violation_format_without_edits_is_not_fixable() {
        let v = make_violation(Severity::Warning)
            .with_suggestion(Suggestion::new("Re-indent by hand"));
        assert!(!v.format().contains("[fixable]"));
        assert!(!v.is_fixable());
        assert!(v.edits().is_empty());
    }

    #[test]
    fn edits_overlap() {
        let a = TextEdit::delete(10, 2);
        assert!(a.overlaps(&TextEdit::insert(11, " ")));
        assert!(a.overlaps(&TextEdit::insert(10, " ")));
        assert!(!a.overlaps(&TextEdit::insert(12, " ")));
        assert!(!a.overlaps(&TextEdit::delete(4, 6)));
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
    }

    #[test]
    fn count_and_sort() {
        let mut result = LintResult::new();
        let mut late = make_violation(Severity::Error);
        late.location.line = 9;
        result.violations.push(late);
        result.violations.push(make_violation(Severity::Warning));
        result.sort();

        assert_eq!(result.violations[0].location.line, 3);
        assert_eq!(result.count_by_severity(), (1, 1, 0));
    }
}
