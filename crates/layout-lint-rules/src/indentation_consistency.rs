//! Rule to keep sibling statements of a block on one indentation column.
//!
//! # Rationale
//!
//! Statements executed in sequence read as a unit only when they start at the
//! same column. A stray space makes a statement look nested or detached.
//!
//! # Detected Patterns
//!
//! - A statement whose first token starts at a different column than the
//!   first statement of its section
//!
//! Under the `sectioned` style, section markers (Ruby's `private`,
//! `protected`, ...) split a block into sections that are aligned
//! independently, so members following a marker may be indented one level
//! deeper:
//!
//! ```ruby
//! class Account
//!   def open; end
//!
//!   private
//!
//!     def audit; end
//! end
//! ```
//!
//! # Configuration
//!
//! - `style`: `normal` (default) or `sectioned` (`rails` is accepted as an alias)

use layout_lint_core::utils::check_allow_with_reason;
use layout_lint_core::{
    column_delta, indent_edit, AlignmentCorrector, AlignmentUtility, ConfigError, FileContext,
    KindTag, Label, Location, MarkerClassifier, Node, Rule, RuleConfig, Severity, SourceText,
    Suggestion, TextEdit, Violation,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Rule code for indentation-consistency.
pub const CODE: &str = "LL001";

/// Rule name for indentation-consistency.
pub const NAME: &str = "indentation-consistency";

/// Message reported for every misaligned statement.
pub const MESSAGE: &str = "Inconsistent indentation detected.";

/// How section markers affect alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePolicy {
    /// Markers are ordinary statements; the whole block shares one column.
    #[default]
    Normal,
    /// Markers start a new, independently aligned section.
    #[serde(alias = "rails")]
    Sectioned,
}

impl StylePolicy {
    /// Accepted configuration values.
    pub const VALUES: &'static str = "normal, sectioned, rails";
}

impl FromStr for StylePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "sectioned" | "rails" => Ok(Self::Sectioned),
            other => Err(other.to_string()),
        }
    }
}

/// Contiguous run of statements sharing one indentation baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section<'n> {
    statements: Vec<&'n Node>,
}

impl<'n> Section<'n> {
    /// Statements of this section in source order.
    #[must_use]
    pub fn statements(&self) -> &[&'n Node] {
        &self.statements
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if the section holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A statement that does not start at its section's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch<'n> {
    /// The misaligned statement.
    pub statement: &'n Node,
    /// First statement of the section, which sets the expected column.
    pub anchor: &'n Node,
    /// Column the statement should start at (0-indexed).
    pub expected_column: usize,
    /// Column the statement starts at (0-indexed).
    pub actual_column: usize,
}

impl Mismatch<'_> {
    /// Columns to insert (positive) or remove (negative).
    #[must_use]
    pub fn delta(&self) -> isize {
        column_delta(self.expected_column, self.actual_column)
    }
}

/// Splits block children into sections.
///
/// There is always one initial section. Under [`StylePolicy::Sectioned`] a
/// marker opens a new section and is itself dropped; under
/// [`StylePolicy::Normal`] it is kept like any statement. An empty child list
/// produces no sections.
pub fn partition<'n, I>(
    children: I,
    policy: StylePolicy,
    markers: &dyn MarkerClassifier,
) -> Vec<Section<'n>>
where
    I: IntoIterator<Item = &'n Node>,
{
    let mut children = children.into_iter().peekable();
    if children.peek().is_none() {
        return Vec::new();
    }

    let mut sections = vec![Section::default()];
    for child in children {
        if policy == StylePolicy::Sectioned && markers.is_section_marker(child) {
            sections.push(Section::default());
            continue;
        }
        if let Some(current) = sections.last_mut() {
            current.statements.push(child);
        }
    }
    sections
}

/// Compares every statement of a section with the section's first statement.
///
/// Statements sharing a line with the previous statement, or not starting
/// their line, are not indentation and are left alone.
pub fn check_section<'n>(section: &Section<'n>, source: &SourceText<'_>) -> Vec<Mismatch<'n>> {
    let &[anchor, ref rest @ ..] = section.statements() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return Vec::new();
    }

    let expected_column = source.column_of(anchor);
    let mut previous_line = anchor.line();
    let mut mismatches = Vec::new();

    for &statement in rest {
        let on_new_line = statement.line() > previous_line;
        previous_line = statement.line();
        if !on_new_line || !source.begins_its_line(statement) {
            continue;
        }

        let actual_column = source.column_of(statement);
        if actual_column != expected_column {
            mismatches.push(Mismatch {
                statement,
                anchor,
                expected_column,
                actual_column,
            });
        }
    }
    mismatches
}

/// Edit moving the mismatched statement's first token onto the expected column.
///
/// Touches only the whitespace directly before the first token.
#[must_use]
pub fn correct(mismatch: &Mismatch<'_>, source: &SourceText<'_>) -> TextEdit {
    indent_edit(source, mismatch.statement.range.start.offset, mismatch.delta())
}

/// Edits moving the whole mismatched statement, nested lines included.
#[must_use]
pub fn autocorrect(mismatch: &Mismatch<'_>, source: &SourceText<'_>) -> Vec<TextEdit> {
    AlignmentCorrector::correct(source, mismatch.statement, mismatch.delta())
}

/// Checks that sibling statements of a block start at the same column.
#[derive(Debug, Clone)]
pub struct IndentationConsistency {
    style: StylePolicy,
    severity: Severity,
}

impl Default for IndentationConsistency {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentationConsistency {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            style: StylePolicy::Normal,
            severity: Severity::Warning,
        }
    }

    /// Sets the style policy.
    #[must_use]
    pub fn style(mut self, style: StylePolicy) -> Self {
        self.style = style;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Builds the rule from its `[rules.indentation-consistency]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `style` is not recognized.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let raw = config.get_str("style", "normal");
        let style = raw.parse().map_err(|value| ConfigError::InvalidOption {
            rule: NAME.to_string(),
            key: "style".to_string(),
            value,
            expected: StylePolicy::VALUES.to_string(),
        })?;

        let mut rule = Self::new().style(style);
        if let Some(severity) = config.severity {
            rule = rule.severity(severity);
        }
        Ok(rule)
    }

    /// Finds every misaligned statement directly inside `block`.
    ///
    /// Each section is checked on its own; a statement is reported at most once.
    pub fn mismatches<'n>(
        &self,
        block: &'n Node,
        markers: &dyn MarkerClassifier,
        source: &SourceText<'_>,
    ) -> Vec<Mismatch<'n>> {
        partition(block.statements(), self.style, markers)
            .iter()
            .flat_map(|section| check_section(section, source))
            .collect()
    }

    fn violation(&self, ctx: &FileContext, mismatch: &Mismatch<'_>) -> Violation {
        let location = Location::from_node(ctx.relative_path.clone(), mismatch.statement);
        let anchor = Location::from_node(ctx.relative_path.clone(), mismatch.anchor);

        Violation::new(CODE, NAME, self.severity, location, MESSAGE)
            .with_suggestion(Suggestion::with_edits(
                format!("Indent to column {}", mismatch.expected_column + 1),
                autocorrect(mismatch, &ctx.source),
            ))
            .with_label(Label::new(anchor, "section alignment starts here"))
    }
}

impl Rule for IndentationConsistency {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks that sibling statements of a block are indented consistently"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn node_kinds(&self) -> &'static [KindTag] {
        &[KindTag::Begin, KindTag::KwBegin]
    }

    fn supports_autocorrect(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, node: &Node) -> Vec<Violation> {
        let mismatches = self.mismatches(node, ctx.markers, &ctx.source);
        if mismatches.is_empty() {
            return Vec::new();
        }

        debug!(
            file = %ctx.relative_path.display(),
            line = node.line(),
            count = mismatches.len(),
            "misaligned statements in block"
        );

        mismatches
            .iter()
            .filter(|m| {
                let allowed = check_allow_with_reason(ctx.content, m.statement.line(), NAME);
                if let Some(reason) = allowed.reason() {
                    debug!(line = m.statement.line(), reason, "allowed by directive");
                }
                !allowed.is_allowed()
            })
            .map(|m| self.violation(ctx, m))
            .collect()
    }
}
