//! # layout-lint-core
//!
//! Core framework for layout linting over language-neutral syntax trees.
//!
//! This crate provides the foundational traits and types for building
//! layout linters. It includes:
//!
//! - [`Node`] and friends, the tree model rules inspect
//! - [`LanguageHost`] for plugging in a parser and marker classification
//! - [`Rule`] trait and the [`Dispatcher`] that routes nodes to rules
//! - [`AlignmentUtility`] and [`AlignmentCorrector`] for column checks and fixes
//! - [`Analyzer`] for orchestrating lint and autocorrect runs
//! - [`Violation`] and [`TextEdit`] for representing findings and fixes
//!
//! ## Example
//!
//! ```ignore
//! use layout_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./app")
//!     .host(RubyHost::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alignment;
mod analyzer;
mod config;
mod context;
mod fix;
mod language;
mod rule;
mod source;
mod syntax;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use alignment::{column_delta, indent_edit, AlignmentCorrector, AlignmentUtility};
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FixedSource};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use fix::{apply_edits, FixOutcome};
pub use language::{HostBox, LanguageHost, ParseError};
pub use rule::{Dispatcher, MarkerClassifier, NoMarkers, Rule, RuleBox};
pub use source::SourceText;
pub use syntax::{CallInfo, KindTag, Node, NodeKind, Position, SourceRange};
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, TextEdit, Violation, ViolationDiagnostic,
};
pub use utils::allowance::{AllowCheck, AllowDirective};
