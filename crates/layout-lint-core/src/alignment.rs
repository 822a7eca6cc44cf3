//! Shared alignment helpers for layout rules.
//!
//! [`AlignmentUtility`] answers column questions about nodes, and
//! [`AlignmentCorrector`] turns a column delta into edits that move a whole
//! node while preserving the relative indentation of its nested lines.

use crate::source::SourceText;
use crate::syntax::{Node, NodeKind};
use crate::types::TextEdit;

/// Column queries rules need to compare node alignment.
pub trait AlignmentUtility {
    /// Character column (0-indexed) of the node's first character.
    fn column_of(&self, node: &Node) -> usize;

    /// Byte offset of the start of the line containing `offset`.
    fn line_start_offset(&self, offset: usize) -> usize;

    /// Returns true if only indentation (spaces, tabs) precedes the node on
    /// its first line.
    fn begins_its_line(&self, node: &Node) -> bool;
}

impl AlignmentUtility for SourceText<'_> {
    fn column_of(&self, node: &Node) -> usize {
        self.position(node.range.start.offset).column
    }

    fn line_start_offset(&self, offset: usize) -> usize {
        self.line_start(self.line_of(offset))
    }

    fn begins_its_line(&self, node: &Node) -> bool {
        let offset = node.range.start.offset;
        let start = self.line_start_offset(offset);
        self.content()
            .get(start..offset)
            .is_some_and(|prefix| prefix.chars().all(is_indent_char))
    }
}

/// Signed number of columns needed to move `actual` onto `expected`.
#[must_use]
pub fn column_delta(expected: usize, actual: usize) -> isize {
    isize::try_from(expected).unwrap_or(isize::MAX) - isize::try_from(actual).unwrap_or(isize::MAX)
}

fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Edit that shifts the token at `offset` by `delta` columns.
///
/// A positive delta inserts spaces before the token; a negative delta removes
/// up to `|delta|` indentation characters immediately before it.
#[must_use]
pub fn indent_edit(source: &SourceText<'_>, offset: usize, delta: isize) -> TextEdit {
    if delta >= 0 {
        return TextEdit::insert(offset, " ".repeat(delta.unsigned_abs()));
    }

    let line_start = source.line_start_offset(offset);
    let prefix = source.content().get(line_start..offset).unwrap_or("");
    let removable: usize = prefix
        .chars()
        .rev()
        .take_while(|c| is_indent_char(*c))
        .take(delta.unsigned_abs())
        .map(char::len_utf8)
        .sum();

    TextEdit::delete(offset - removable, removable)
}

/// Moves a node and its nested lines by a column delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentCorrector;

impl AlignmentCorrector {
    /// Builds the edits that shift `node` by `delta` columns.
    ///
    /// The first edit re-indents the node's first token. Every further line the
    /// node covers is shifted by the same delta at its line start, except blank
    /// lines, lines of verbatim text (string interiors and heredoc bodies), and
    /// lines without enough leading indentation to remove. Edits are returned
    /// in offset order and never overlap.
    #[must_use]
    pub fn correct(source: &SourceText<'_>, node: &Node, delta: isize) -> Vec<TextEdit> {
        if delta == 0 {
            return Vec::new();
        }

        let mut edits = vec![indent_edit(source, node.range.start.offset, delta)];

        let first_line = node.range.start.line;
        let last_line = node.range.last_line();

        let verbatim = verbatim_lines(node);
        let width = delta.unsigned_abs();

        for line in first_line + 1..=last_line {
            if verbatim.iter().any(|(from, to)| line >= *from && line <= *to) {
                continue;
            }

            let text = source.line_text(line);
            if text.trim().is_empty() {
                continue;
            }

            let start = source.line_start(line);
            if delta > 0 {
                edits.push(TextEdit::insert(start, " ".repeat(width)));
            } else {
                let leading = text.chars().take_while(|c| is_indent_char(*c)).count();
                if leading >= width {
                    edits.push(TextEdit::delete(start, width));
                }
            }
        }

        edits
    }
}

/// Inclusive line ranges whose text must not be re-indented.
fn verbatim_lines(node: &Node) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    node.walk(&mut |n| match n.kind {
        // The opening line belongs to the statement; the interior does not.
        NodeKind::Str if n.range.is_multiline() => {
            spans.push((n.range.start.line + 1, n.range.end.line));
        }
        NodeKind::Verbatim => spans.push((n.range.start.line, n.range.last_line())),
        _ => {}
    });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::apply_edits;
    use crate::syntax::{Position, SourceRange};

    fn node_at(src: &SourceText<'_>, kind: NodeKind, start: usize, end: usize) -> Node {
        Node::new(kind, SourceRange::new(src.position(start), src.position(end)))
    }

    fn find(content: &str, needle: &str) -> usize {
        content.find(needle).unwrap_or_default()
    }

    #[test]
    fn column_and_line_start() {
        let content = "a\n  bb\n";
        let src = SourceText::new(content);
        let node = node_at(&src, NodeKind::Other("x".into()), 4, 6);
        assert_eq!(src.column_of(&node), 2);
        assert_eq!(src.line_start_offset(5), 2);
        assert!(src.begins_its_line(&node));
    }

    #[test]
    fn second_statement_on_a_line_does_not_begin_it() {
        let content = "a; b\n";
        let src = SourceText::new(content);
        let node = node_at(&src, NodeKind::Other("x".into()), 3, 4);
        assert!(!src.begins_its_line(&node));
    }

    #[test]
    fn only_spaces_and_tabs_count_as_indentation() {
        let content = "\t x\n\u{c}y\n\u{a0}z\n";
        let src = SourceText::new(content);
        let x = node_at(&src, NodeKind::Other("x".into()), 2, 3);
        let y = node_at(&src, NodeKind::Other("y".into()), 5, 6);
        let z = node_at(&src, NodeKind::Other("z".into()), 9, 10);
        assert!(src.begins_its_line(&x));
        assert!(!src.begins_its_line(&y));
        assert!(!src.begins_its_line(&z));
    }

    #[test]
    fn delta_sign() {
        assert_eq!(column_delta(2, 3), -1);
        assert_eq!(column_delta(4, 2), 2);
        assert_eq!(column_delta(2, 2), 0);
    }

    #[test]
    fn indent_edit_inserts_and_removes() {
        let content = "   x\n";
        let src = SourceText::new(content);
        assert_eq!(indent_edit(&src, 3, 2), TextEdit::insert(3, "  "));
        assert_eq!(indent_edit(&src, 3, -1), TextEdit::delete(2, 1));
        // Never removes more than the available indentation.
        assert_eq!(indent_edit(&src, 3, -7), TextEdit::delete(0, 3));
    }

    #[test]
    fn corrector_shifts_nested_lines() {
        let content = "def a\n   if x\n     y\n   end\nend\n";
        let src = SourceText::new(content);
        let start = find(content, "if x");
        let end = find(content, "end\nend") + 3;
        let node = node_at(&src, NodeKind::Other("if".into()), start, end);

        let edits = AlignmentCorrector::correct(&src, &node, -1);
        let fixed = apply_edits(content, &edits).content;
        assert_eq!(fixed, "def a\n  if x\n    y\n  end\nend\n");
    }

    #[test]
    fn corrector_skips_string_interior_and_blank_lines() {
        let content = "  foo(\"a\n    b\")\n\n    c\n";
        let src = SourceText::new(content);
        let string_start = find(content, "\"a");
        let string_end = find(content, "b\")") + 2;
        let string = node_at(&src, NodeKind::Str, string_start, string_end);
        let end = find(content, "c\n") + 1;
        let node = node_at(&src, NodeKind::Other("call".into()), 2, end).with_children(vec![string]);

        let edits = AlignmentCorrector::correct(&src, &node, 2);
        let fixed = apply_edits(content, &edits).content;
        assert_eq!(fixed, "    foo(\"a\n    b\")\n\n      c\n");
    }

    #[test]
    fn corrector_leaves_underindented_lines() {
        let content = "  x(\n1)\n";
        let src = SourceText::new(content);
        let node = node_at(&src, NodeKind::Other("call".into()), 2, 8);
        let edits = AlignmentCorrector::correct(&src, &node, -2);
        assert_eq!(edits, vec![TextEdit::delete(0, 2)]);
    }

    #[test]
    fn corrector_skips_verbatim_ending_at_line_start() {
        let content = "  x(\n=begin\ndoc\n=end\n  1)\n";
        let src = SourceText::new(content);
        let doc_start = find(content, "=begin");
        let doc_end = find(content, "  1)");
        let doc = node_at(&src, NodeKind::Verbatim, doc_start, doc_end);
        let end = find(content, ")\n") + 1;
        let node = node_at(&src, NodeKind::Other("call".into()), 2, end).with_children(vec![doc]);

        let edits = AlignmentCorrector::correct(&src, &node, 2);
        let fixed = apply_edits(content, &edits).content;
        assert_eq!(fixed, "    x(\n=begin\ndoc\n=end\n    1)\n");
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let src = SourceText::new("x\n");
        let node = Node::new(
            NodeKind::Str,
            SourceRange::new(Position::new(1, 0, 0), Position::new(1, 1, 1)),
        );
        assert!(AlignmentCorrector::correct(&src, &node, 0).is_empty());
    }
}
