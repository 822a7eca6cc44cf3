//! Context types for rule execution.

use crate::rule::MarkerClassifier;
use crate::source::SourceText;
use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Carries the source being checked and the language-specific capabilities
/// rules rely on but must not implement themselves.
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Line index over `content`.
    pub source: SourceText<'a>,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Classifies section marker statements for the file's language.
    pub markers: &'a dyn MarkerClassifier,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        root: &Path,
        markers: &'a dyn MarkerClassifier,
    ) -> Self {
        // A root that is the file itself leaves an empty relative path.
        let relative_path = match path.strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
            _ => path.to_path_buf(),
        };

        Self {
            path,
            content,
            source: SourceText::new(content),
            relative_path,
            markers,
        }
    }
}

impl std::fmt::Debug for FileContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContext")
            .field("path", &self.path)
            .field("relative_path", &self.relative_path)
            .field("lines", &self.source.line_count())
            .finish_non_exhaustive()
    }
}
