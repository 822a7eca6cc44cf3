//! Ruby section markers.

use layout_lint_core::{MarkerClassifier, Node};

/// Methods that change the visibility of the definitions following them.
pub const ACCESS_MODIFIERS: &[&str] = &["private", "protected", "public", "module_function"];

/// Classifies receiver-less access modifier calls in macro scope as markers.
///
/// Both the bare form (`private`) and the declaration forms (`private :foo`,
/// `private def foo`) count; `self.private` does not. A call inside a method
/// body is not in macro scope and is an ordinary statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubyAccessModifier;

impl MarkerClassifier for RubyAccessModifier {
    fn is_section_marker(&self, node: &Node) -> bool {
        node.call().is_some_and(|call| {
            !call.has_receiver
                && call.macro_scope
                && ACCESS_MODIFIERS.contains(&call.method.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_lint_core::{CallInfo, NodeKind, Position, SourceRange};

    fn send(method: &str, has_receiver: bool, argument_count: usize) -> Node {
        let at = Position::new(1, 0, 0);
        Node::new(
            NodeKind::Send(CallInfo {
                method: method.to_string(),
                has_receiver,
                argument_count,
                macro_scope: true,
            }),
            SourceRange::new(at, at),
        )
    }

    #[test]
    fn bare_modifiers_are_markers() {
        for method in ACCESS_MODIFIERS {
            assert!(RubyAccessModifier.is_section_marker(&send(method, false, 0)));
        }
    }

    #[test]
    fn modifier_declarations_are_markers() {
        assert!(RubyAccessModifier.is_section_marker(&send("private", false, 1)));
        assert!(RubyAccessModifier.is_section_marker(&send("module_function", false, 2)));
    }

    #[test]
    fn modifier_with_receiver_or_other_method_is_not_a_marker() {
        assert!(!RubyAccessModifier.is_section_marker(&send("private", true, 0)));
        assert!(!RubyAccessModifier.is_section_marker(&send("puts", false, 0)));
    }

    #[test]
    fn modifier_outside_macro_scope_is_not_a_marker() {
        let mut node = send("private", false, 0);
        if let NodeKind::Send(call) = &mut node.kind {
            call.macro_scope = false;
        }
        assert!(!RubyAccessModifier.is_section_marker(&node));
    }

    #[test]
    fn non_calls_are_not_markers() {
        let at = Position::new(1, 0, 0);
        let node = Node::new(NodeKind::Other("identifier".into()), SourceRange::new(at, at));
        assert!(!RubyAccessModifier.is_section_marker(&node));
    }
}
