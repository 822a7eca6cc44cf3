//! Rule traits and node-kind dispatch.

use crate::context::FileContext;
use crate::syntax::{KindTag, Node};
use crate::types::{Severity, Violation};
use std::collections::HashMap;

/// A per-node lint rule.
///
/// Rules register the node kinds they care about through
/// [`Rule::node_kinds`]; the [`Dispatcher`] then calls [`Rule::check`] once
/// for every node of those kinds while walking a file's tree.
///
/// # Example
///
/// ```ignore
/// use layout_lint_core::{FileContext, KindTag, Node, Rule, Violation};
///
/// pub struct NoEmptyBegin;
///
/// impl Rule for NoEmptyBegin {
///     fn name(&self) -> &'static str { "no-empty-begin" }
///     fn code(&self) -> &'static str { "LL900" }
///     fn node_kinds(&self) -> &'static [KindTag] { &[KindTag::KwBegin] }
///
///     fn check(&self, ctx: &FileContext, node: &Node) -> Vec<Violation> {
///         // ...
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "indentation-consistency").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "LL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Node kinds this rule wants to be called for.
    fn node_kinds(&self) -> &'static [KindTag];

    /// Whether violations from this rule carry automatic edits.
    fn supports_autocorrect(&self) -> bool {
        false
    }

    /// Checks a single node of a registered kind.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `node` - The node being visited
    fn check(&self, ctx: &FileContext, node: &Node) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Language knowledge deciding which statements divide a block into sections.
///
/// Supplied by the language host, e.g. Ruby's bare `private` / `protected`.
pub trait MarkerClassifier: Send + Sync {
    /// Returns true if `node` is a section marker statement.
    fn is_section_marker(&self, node: &Node) -> bool;
}

/// Classifier for languages without section markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarkers;

impl MarkerClassifier for NoMarkers {
    fn is_section_marker(&self, _node: &Node) -> bool {
        false
    }
}

/// Routes visited nodes to the rules registered for their kind.
pub struct Dispatcher<'r> {
    rules: Vec<&'r dyn Rule>,
    by_kind: HashMap<KindTag, Vec<usize>>,
}

impl<'r> Dispatcher<'r> {
    /// Registers every rule for the node kinds it declares.
    #[must_use]
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'r dyn Rule>,
    {
        let rules: Vec<&'r dyn Rule> = rules.into_iter().collect();
        let mut by_kind: HashMap<KindTag, Vec<usize>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            for kind in rule.node_kinds() {
                by_kind.entry(*kind).or_default().push(idx);
            }
        }
        Self { rules, by_kind }
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Walks `root` in pre-order and collects violations per rule name.
    ///
    /// Violations are returned grouped with the name of the rule that
    /// produced them so callers can apply per-rule configuration.
    #[must_use]
    pub fn run(&self, ctx: &FileContext, root: &Node) -> Vec<(&'static str, Vec<Violation>)> {
        let mut found: Vec<(&'static str, Vec<Violation>)> =
            self.rules.iter().map(|r| (r.name(), Vec::new())).collect();

        if self.by_kind.is_empty() {
            return found;
        }

        root.walk(&mut |node| {
            let Some(interested) = self.by_kind.get(&node.kind.tag()) else {
                return;
            };
            for idx in interested {
                let violations = self.rules[*idx].check(ctx, node);
                found[*idx].1.extend(violations);
            }
        });

        found
    }
}
