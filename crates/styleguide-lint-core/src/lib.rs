//! # styleguide-lint-core
//!
//! Core framework for checking pre-lexed Puppet manifests against an
//! organisation's architecture conventions.
//!
//! This crate provides the building blocks rules are written with:
//!
//! - [`TokenStream`] with precomputed code-token neighbours
//! - [`predicates`] classifying single tokens (function calls, includes, ...)
//! - [`parse_params`] turning a parameter list into a [`ParamMap`]
//! - [`node_indexes`] and [`definition_indexes`] carving out resources
//! - [`Resource`], a derived view answering questions about one resource
//! - [`Rule`] trait and [`Analyzer`] for orchestrating lint execution
//!
//! ## Example
//!
//! ```ignore
//! use styleguide_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./modules")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod index;
mod params;
mod resource;
mod rule;
mod token;
mod types;

/// Token classification helpers.
pub mod predicates;

/// Source tokenizer for writing tests in manifest form.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, TOKEN_FILE_SUFFIX};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig, StyleguideConfig};
pub use context::FileContext;
pub use index::{definition_indexes, node_indexes, RecordKind, ResourceRecord};
pub use params::{parse_params, Param, ParamMap};
pub use resource::{Classification, Resource};
pub use rule::{FixError, Rule, RuleBox};
pub use token::{Token, TokenKind, TokenRef, TokenStream};
pub use types::{Edit, LintResult, Location, Severity, Violation};
