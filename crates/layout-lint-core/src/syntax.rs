//! Language-neutral syntax tree consumed by rules.
//!
//! Language hosts convert their concrete syntax trees into [`Node`]s. Rules
//! only ever see this model, so a rule works for any language whose host can
//! produce it.

use serde::{Deserialize, Serialize};

/// A point in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column in characters from the start of the line (0-indexed).
    pub column: usize,
    /// Byte offset from the start of the buffer.
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Half-open source range covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// First character of the node.
    pub start: Position,
    /// One past the last character of the node.
    pub end: Position,
}

impl SourceRange {
    /// Creates a new range.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Length of the range in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the range covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last line holding a character of the range.
    ///
    /// A range ending at column 0 stops on the line before.
    #[must_use]
    pub fn last_line(&self) -> usize {
        if self.end.column == 0 && self.end.line > self.start.line {
            self.end.line - 1
        } else {
            self.end.line
        }
    }

    /// Returns true if the range spans more than one line.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.end.line > self.start.line
    }
}

/// Details of a method call node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallInfo {
    /// Called method name.
    pub method: String,
    /// Whether the call has an explicit receiver (`obj.method`).
    pub has_receiver: bool,
    /// Number of arguments passed.
    pub argument_count: usize,
    /// Whether the call sits where class-level macros do: a class, module or
    /// top-level body, or a block, branch or `begin` nested in one.
    #[serde(default)]
    pub macro_scope: bool,
}

/// Kind of a syntax node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Implicit sequence of statements (method bodies, branches, files).
    Begin,
    /// Explicit `begin ... end` block.
    KwBegin,
    /// Method call.
    Send(CallInfo),
    /// String-like literal. Lines inside it are verbatim text.
    Str,
    /// Verbatim text attached to a block that is not a statement (heredoc bodies).
    Verbatim,
    /// Clause attached to a body that is not a statement (`rescue`, `ensure`, ...).
    Clause,
    /// Any other node, tagged with the host's node name.
    Other(String),
}

impl NodeKind {
    /// Returns true for block-like nodes whose children are statements.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Begin | Self::KwBegin)
    }

    /// Returns true if nodes of this kind count as statements of their parent.
    #[must_use]
    pub fn is_statement(&self) -> bool {
        !matches!(self, Self::Clause | Self::Verbatim)
    }

    /// Discriminant used to register rule interest, ignoring payloads.
    #[must_use]
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Begin => KindTag::Begin,
            Self::KwBegin => KindTag::KwBegin,
            Self::Send(_) => KindTag::Send,
            Self::Str => KindTag::Str,
            Self::Verbatim => KindTag::Verbatim,
            Self::Clause => KindTag::Clause,
            Self::Other(_) => KindTag::Other,
        }
    }
}

/// Payload-free node kind, used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindTag {
    /// See [`NodeKind::Begin`].
    Begin,
    /// See [`NodeKind::KwBegin`].
    KwBegin,
    /// See [`NodeKind::Send`].
    Send,
    /// See [`NodeKind::Str`].
    Str,
    /// See [`NodeKind::Verbatim`].
    Verbatim,
    /// See [`NodeKind::Clause`].
    Clause,
    /// See [`NodeKind::Other`].
    Other,
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// Where this node is.
    pub range: SourceRange,
    /// Child nodes in source order.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a leaf node.
    #[must_use]
    pub fn new(kind: NodeKind, range: SourceRange) -> Self {
        Self {
            kind,
            range,
            children: Vec::new(),
        }
    }

    /// Sets the children of this node.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Position of the node's first character.
    #[must_use]
    pub fn start(&self) -> Position {
        self.range.start
    }

    /// Line the node starts on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.range.start.line
    }

    /// Column the node starts at.
    #[must_use]
    pub fn column(&self) -> usize {
        self.range.start.column
    }

    /// Call details, if this node is a method call.
    #[must_use]
    pub fn call(&self) -> Option<&CallInfo> {
        match &self.kind {
            NodeKind::Send(call) => Some(call),
            _ => None,
        }
    }

    /// Children that are statements, in order.
    pub fn statements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|c| c.kind.is_statement())
    }

    /// Visits this node and all descendants in pre-order.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Node),
    {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Collects descendants (excluding self) matching a predicate.
    #[must_use]
    pub fn descendants_where<P>(&self, mut predicate: P) -> Vec<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        let mut found = Vec::new();
        for child in &self.children {
            child.walk(&mut |n| {
                if predicate(n) {
                    found.push(n);
                }
            });
        }
        found
    }
}
