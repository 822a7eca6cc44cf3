//! Application of text edits to a source buffer.

use crate::types::TextEdit;

/// Outcome of applying a batch of edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Rewritten content.
    pub content: String,
    /// Number of edits applied.
    pub applied: usize,
    /// Number of edits skipped because they overlapped an applied edit or
    /// fell outside the buffer.
    pub skipped: usize,
}

impl FixOutcome {
    /// Returns true if the content changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Applies non-overlapping edits to `content`.
///
/// Edits are ordered by offset. An edit overlapping one that was already
/// accepted is skipped rather than applied; callers re-run their checks on
/// the result to pick those up.
#[must_use]
pub fn apply_edits(content: &str, edits: &[TextEdit]) -> FixOutcome {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.offset, e.length));

    let mut accepted: Vec<&TextEdit> = Vec::with_capacity(ordered.len());
    let mut skipped = 0;

    for edit in ordered {
        let in_bounds = edit.end() <= content.len()
            && content.is_char_boundary(edit.offset)
            && content.is_char_boundary(edit.end());
        let overlaps = accepted.last().is_some_and(|prev| prev.overlaps(edit));

        if in_bounds && !overlaps {
            accepted.push(edit);
        } else {
            skipped += 1;
        }
    }

    let mut output = content.to_string();
    // Back to front keeps earlier offsets valid.
    for edit in accepted.iter().rev() {
        output.replace_range(edit.offset..edit.end(), &edit.new_text);
    }

    FixOutcome {
        content: output,
        applied: accepted.len(),
        skipped,
    }
}
