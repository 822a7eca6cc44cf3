//! Line index over a source buffer.

use crate::syntax::Position;

/// A source buffer with a precomputed line index.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    content: &'a str,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    /// Indexes the given content.
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            content,
            line_starts,
        }
    }

    /// The whole buffer.
    #[must_use]
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Number of lines (a trailing newline starts an empty last line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where the given 1-indexed line starts.
    ///
    /// Lines past the end clamp to the end of the buffer.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        match line {
            0 => 0,
            l => self
                .line_starts
                .get(l - 1)
                .copied()
                .unwrap_or(self.content.len()),
        }
    }

    /// Text of the given 1-indexed line, without its line terminator.
    #[must_use]
    pub fn line_text(&self, line: usize) -> &'a str {
        if line == 0 || line > self.line_count() {
            return "";
        }
        let start = self.line_start(line);
        let end = self
            .line_starts
            .get(line)
            .map_or(self.content.len(), |next| next - 1);
        let text = &self.content[start..end];
        text.strip_suffix('\r').unwrap_or(text)
    }

    /// 1-indexed line containing the byte offset.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// Converts a byte offset to a position with a character column.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let column = self
            .content
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        Position::new(line, column, offset)
    }
}
