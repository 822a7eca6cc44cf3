//! # layout-lint-rules
//!
//! Built-in layout rules for layout-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | LL001 | `indentation-consistency` | Sibling statements of a block start at the same column |
//!
//! ## Usage
//!
//! ```ignore
//! use layout_lint_core::Analyzer;
//! use layout_lint_rules::{IndentationConsistency, StylePolicy};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./app")
//!     .host(RubyHost::new())
//!     .rule(IndentationConsistency::new().style(StylePolicy::Sectioned))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod indentation_consistency;
mod registry;

pub use indentation_consistency::{
    autocorrect, check_section, correct, partition, IndentationConsistency, Mismatch, Section,
    StylePolicy,
};
pub use registry::{all_rules, rules_from_config, RULE_NAMES};

/// Re-export core types for convenience.
pub use layout_lint_core::{Rule, Severity, Violation};
