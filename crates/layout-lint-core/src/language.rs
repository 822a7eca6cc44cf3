//! Language host abstraction.
//!
//! A host owns everything language-specific: which files it handles, how
//! source text becomes a [`Node`] tree, and which statements are section
//! markers. Rules stay language-neutral.

use crate::rule::MarkerClassifier;
use crate::syntax::Node;

/// Error produced when a host cannot build a tree for a source buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Line of the first problem (1-indexed).
    pub line: usize,
    /// Column of the first problem (1-indexed).
    pub column: usize,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Language-specific collaborator producing trees for rules.
pub trait LanguageHost: Send + Sync {
    /// Language identifier (e.g., `"ruby"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this host handles, with the leading dot (e.g., `&[".rb"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Exact file names this host handles regardless of extension (e.g., `Gemfile`).
    fn file_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Parses source text into a tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the source is not syntactically valid.
    fn parse(&self, source: &str) -> Result<Node, ParseError>;

    /// Section marker classification for this language.
    fn markers(&self) -> &dyn MarkerClassifier;

    /// Returns true if the host handles the given path.
    fn handles(&self, path: &std::path::Path) -> bool {
        let by_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.file_names().contains(&name));
        let by_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.strip_prefix('.') == Some(ext))
            });
        by_name || by_ext
    }
}

/// Type alias for boxed host trait objects.
pub type HostBox = Box<dyn LanguageHost>;
