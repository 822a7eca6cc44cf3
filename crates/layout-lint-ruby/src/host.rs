//! Ruby host using Tree-sitter.

use layout_lint_core::{
    CallInfo, LanguageHost, MarkerClassifier, Node, NodeKind, ParseError, SourceRange, SourceText,
};
use tracing::debug;
use tree_sitter::{Language, Parser};

use crate::markers::RubyAccessModifier;

/// Tree-sitter node kinds holding a plain sequence of statements.
const STATEMENT_CONTAINERS: &[&str] = &[
    "program",
    "body_statement",
    "then",
    "do",
    "block_body",
    "parenthesized_statements",
    "begin_block",
    "end_block",
];

/// Literal kinds whose inner lines are verbatim text.
const STRING_LIKE: &[&str] = &[
    "string",
    "subshell",
    "regex",
    "string_array",
    "symbol_array",
    "delimited_symbol",
];

/// Parses Ruby files into layout trees.
pub struct RubyHost {
    language: Language,
    markers: RubyAccessModifier,
}

impl RubyHost {
    /// Creates a new Ruby host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_ruby::LANGUAGE.into(),
            markers: RubyAccessModifier,
        }
    }
}

impl Default for RubyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageHost for RubyHost {
    fn language_id(&self) -> &'static str {
        "ruby"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".rb", ".rake", ".gemspec", ".ru"]
    }

    fn file_names(&self) -> &'static [&'static str] {
        &["Gemfile", "Rakefile", "Guardfile"]
    }

    fn parse(&self, source: &str) -> Result<Node, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::new(format!("ruby grammar unavailable: {e}"), 1, 1))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new("parser returned no tree", 1, 1))?;
        let root = tree.root_node();
        let text = SourceText::new(source);

        if root.has_error() {
            let err = first_error(root).map_or_else(
                || ParseError::new("syntax error", 1, 1),
                |node| {
                    let at = text.position(node.start_byte());
                    let message = if node.is_missing() {
                        format!("missing `{}`", node.kind())
                    } else {
                        "syntax error".to_string()
                    };
                    ParseError::new(message, at.line, at.column + 1)
                },
            );
            debug!(%err, "rejecting ruby source");
            return Err(err);
        }

        Ok(Lowering { source: text }.lower(root, Place::default()))
    }

    fn markers(&self) -> &dyn MarkerClassifier {
        &self.markers
    }
}

/// Depth-first search for the first error or missing node.
fn first_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

/// Where a node sits while lowering.
#[derive(Debug, Clone, Copy, Default)]
struct Place {
    /// Directly inside a statement sequence.
    statement: bool,
    /// In a class, module or top-level body, or a block, branch or `begin`
    /// nested in one.
    macro_scope: bool,
}

impl Place {
    const EXPRESSION: Self = Self {
        statement: false,
        macro_scope: false,
    };

    const CLASS_BODY: Self = Self {
        statement: false,
        macro_scope: true,
    };

    fn body(macro_scope: bool) -> Self {
        Self {
            statement: true,
            macro_scope,
        }
    }

    fn nested(self) -> Self {
        Self {
            statement: false,
            ..self
        }
    }
}

/// Constants whose `new` block defines a class body.
const CLASS_CONSTRUCTORS: &[&str] = &["Class", "Module", "Struct"];

/// Converts a Tree-sitter tree into layout nodes.
struct Lowering<'a> {
    source: SourceText<'a>,
}

impl Lowering<'_> {
    fn range(&self, node: &tree_sitter::Node<'_>) -> SourceRange {
        SourceRange::new(
            self.source.position(node.start_byte()),
            self.source.position(node.end_byte()),
        )
    }

    fn text(&self, node: &tree_sitter::Node<'_>) -> &str {
        self.source
            .content()
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    fn lower(&self, node: tree_sitter::Node<'_>, place: Place) -> Node {
        let range = self.range(&node);
        let kind = node.kind();

        if STATEMENT_CONTAINERS.contains(&kind) {
            let scope = place.macro_scope || kind == "program";
            return Node::new(NodeKind::Begin, range)
                .with_children(self.children(node, Place::body(scope)));
        }
        if STRING_LIKE.contains(&kind) {
            return Node::new(NodeKind::Str, range);
        }

        match kind {
            "begin" => Node::new(NodeKind::KwBegin, range)
                .with_children(self.children(node, Place::body(place.macro_scope))),
            // `else` and `ensure` hold their statements inline.
            "else" | "ensure" => {
                let body = Node::new(NodeKind::Begin, range)
                    .with_children(self.children(node, Place::body(place.macro_scope)));
                Node::new(NodeKind::Clause, range).with_children(vec![body])
            }
            "rescue" => Node::new(NodeKind::Clause, range)
                .with_children(self.children(node, place.nested())),
            "heredoc_body" => Node::new(NodeKind::Verbatim, range),
            "call" => {
                let blocks_scope = place.macro_scope || self.is_class_constructor(node);
                let children = self.children_with(node, |child| match child.kind() {
                    "do_block" | "block" if blocks_scope => Place::CLASS_BODY,
                    _ => Place::EXPRESSION,
                });
                Node::new(NodeKind::Send(self.call_info(node, place.macro_scope)), range)
                    .with_children(children)
            }
            "identifier" if place.statement => {
                let call = CallInfo {
                    method: self.text(&node).to_string(),
                    has_receiver: false,
                    argument_count: 0,
                    macro_scope: place.macro_scope,
                };
                Node::new(NodeKind::Send(call), range)
            }
            "class" | "module" | "singleton_class" => {
                Node::new(NodeKind::Other(kind.to_string()), range)
                    .with_children(self.children(node, Place::CLASS_BODY))
            }
            "if" | "unless" | "elsif" | "if_modifier" | "unless_modifier" | "do_block" | "block" => {
                Node::new(NodeKind::Other(kind.to_string()), range)
                    .with_children(self.children(node, place.nested()))
            }
            other => Node::new(NodeKind::Other(other.to_string()), range)
                .with_children(self.children(node, Place::EXPRESSION)),
        }
    }

    fn children(&self, node: tree_sitter::Node<'_>, place: Place) -> Vec<Node> {
        self.children_with(node, |_| place)
    }

    fn children_with<F>(&self, node: tree_sitter::Node<'_>, place_of: F) -> Vec<Node>
    where
        F: Fn(&tree_sitter::Node<'_>) -> Place,
    {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter_map(|child| match child.kind() {
                // Embedded documents must stay at column 0.
                "comment" if self.text(&child).starts_with("=begin") => {
                    Some(Node::new(NodeKind::Verbatim, self.range(&child)))
                }
                "comment" | "empty_statement" => None,
                _ => Some(self.lower(child, place_of(&child))),
            })
            .collect()
    }

    /// `Class.new do ... end` and friends open a class body.
    fn is_class_constructor(&self, node: tree_sitter::Node<'_>) -> bool {
        let method = node.child_by_field_name("method");
        let receiver = node.child_by_field_name("receiver");
        match (receiver, method) {
            (Some(receiver), Some(method)) => {
                self.text(&method) == "new"
                    && CLASS_CONSTRUCTORS.contains(&self.text(&receiver).trim_start_matches("::"))
            }
            _ => false,
        }
    }

    fn call_info(&self, node: tree_sitter::Node<'_>, macro_scope: bool) -> CallInfo {
        let method = node
            .child_by_field_name("method")
            .map_or_else(|| "call".to_string(), |m| self.text(&m).to_string());
        let argument_count = node
            .child_by_field_name("arguments")
            .map_or(0, |args| args.named_child_count());

        CallInfo {
            method,
            has_receiver: node.child_by_field_name("receiver").is_some(),
            argument_count,
            macro_scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_lint_core::KindTag;

    fn parse(src: &str) -> Node {
        RubyHost::new().parse(src).unwrap()
    }

    fn blocks(root: &Node) -> Vec<&Node> {
        let mut found = Vec::new();
        root.walk(&mut |n| {
            if n.kind.is_block() {
                found.push(n);
            }
        });
        found
    }

    #[test]
    fn program_is_a_block_of_top_level_statements() {
        let root = parse("require 'set'\nputs 1\n");
        assert_eq!(root.kind, NodeKind::Begin);
        assert_eq!(root.statements().count(), 2);
    }

    #[test]
    fn class_body_holds_methods_and_bare_modifier() {
        let src = "class Account\n  def open; end\n  private\n    def audit; end\nend\n";
        let root = parse(src);
        let body = blocks(&root)
            .into_iter()
            .find(|b| b.line() == 2)
            .expect("class body");

        let statements: Vec<&Node> = body.statements().collect();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[1].call().map(|c| c.method.as_str()), Some("private"));
        assert!(RubyHost::new().markers().is_section_marker(statements[1]));
        assert_eq!(statements[2].column(), 4);
    }

    #[test]
    fn modifier_with_symbol_is_a_marker_call() {
        let root = parse("class A\n  private :foo\nend\n");
        let calls = root.descendants_where(|n| n.kind.tag() == KindTag::Send);
        assert_eq!(calls.len(), 1);
        let call = calls[0].call().unwrap();
        assert_eq!(call.method, "private");
        assert_eq!(call.argument_count, 1);
        assert!(!call.has_receiver);
        assert!(RubyHost::new().markers().is_section_marker(calls[0]));
    }

    #[test]
    fn kwbegin_separates_statements_from_clauses() {
        let src = "begin\n  a\n  b\nrescue StandardError => e\n  c\nensure\n  d\nend\n";
        let root = parse(src);
        let kwbegin = root
            .descendants_where(|n| n.kind == NodeKind::KwBegin)
            .pop()
            .expect("kwbegin");

        assert_eq!(kwbegin.statements().count(), 2);
        let clauses = kwbegin
            .children
            .iter()
            .filter(|c| c.kind == NodeKind::Clause)
            .count();
        assert_eq!(clauses, 2);
        // rescue body and ensure body are blocks of their own
        assert_eq!(blocks(kwbegin).len(), 3);
    }

    #[test]
    fn comments_are_dropped() {
        let root = parse("# leading\nputs 1 # trailing\n# closing\n");
        assert_eq!(root.statements().count(), 1);
    }

    #[test]
    fn embedded_document_is_verbatim() {
        let root = parse("def g\n=begin\nnotes\n=end\n  1\nend\n");
        let docs = root.descendants_where(|n| n.kind == NodeKind::Verbatim);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].line(), 2);
        assert_eq!(docs[0].range.last_line(), 4);
    }

    fn modifier_calls(root: &Node) -> Vec<&Node> {
        root.descendants_where(|n| n.call().is_some_and(|c| c.method == "private"))
    }

    #[test]
    fn modifier_in_method_body_is_not_in_macro_scope() {
        let root = parse("def f\n  a\n  private\n  b\nend\n");
        let calls = modifier_calls(&root);
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].call().unwrap().macro_scope);
        assert!(!RubyHost::new().markers().is_section_marker(calls[0]));
    }

    #[test]
    fn macro_scope_reaches_blocks_and_branches_of_class_bodies() {
        let src = "\
class A
  included do
    private
  end
  if ENV['X']
    private
  end
  def f
    private
  end
end
private
B = Class.new do
  private
end
";
        let root = parse(src);
        let scoped: Vec<(usize, bool)> = modifier_calls(&root)
            .iter()
            .map(|n| (n.line(), n.call().unwrap().macro_scope))
            .collect();
        assert_eq!(
            scoped,
            vec![(3, true), (6, true), (9, false), (12, true), (14, true)]
        );
    }

    #[test]
    fn multiline_string_is_a_string_node() {
        let root = parse("x = \"a\n  b\"\n");
        let strings = root.descendants_where(|n| n.kind == NodeKind::Str);
        assert_eq!(strings.len(), 1);
        assert!(strings[0].range.is_multiline());
    }

    #[test]
    fn heredoc_body_is_verbatim() {
        let root = parse("x = <<~SQL\n  SELECT 1\nSQL\nputs x\n");
        let verbatim = root.descendants_where(|n| n.kind == NodeKind::Verbatim);
        assert_eq!(verbatim.len(), 1);
        assert!(verbatim[0].range.is_multiline());
    }

    #[test]
    fn columns_count_characters() {
        let root = parse("x = 'é'; y = 1\n  z = 2\n");
        let statements: Vec<&Node> = root.statements().collect();
        assert_eq!(statements[1].column(), 9);
        assert_eq!(statements[2].column(), 2);
    }

    #[test]
    fn syntax_error_is_rejected() {
        let err = RubyHost::new().parse("def broken(\n  a\n").unwrap_err();
        assert!(err.line >= 1);
        assert!(err.to_string().contains("at line"));
    }

    #[test]
    fn handles_ruby_paths() {
        let host = RubyHost::new();
        assert!(host.handles(std::path::Path::new("app/models/user.rb")));
        assert!(host.handles(std::path::Path::new("Gemfile")));
        assert!(!host.handles(std::path::Path::new("README.md")));
    }
}
