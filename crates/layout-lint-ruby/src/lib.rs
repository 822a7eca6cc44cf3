//! # layout-lint-ruby
//!
//! Tree-sitter based Ruby support for layout-lint.
//!
//! This crate plugs Ruby into `layout-lint-core`:
//!
//! - [`RubyHost`] parses Ruby with Tree-sitter and lowers the concrete syntax
//!   tree to layout nodes (`Begin`, `KwBegin`, `Send`, ...)
//! - [`RubyAccessModifier`] marks receiver-less `private` / `protected` / `public` /
//!   `module_function` calls as section markers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod host;
pub mod markers;

pub use host::RubyHost;
pub use markers::{RubyAccessModifier, ACCESS_MODIFIERS};
