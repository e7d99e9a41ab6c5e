//! # styleguide-lint-rules
//!
//! The `wmf-styleguide` check for styleguide-lint.
//!
//! Puppet code is layered: nodes pick a role, roles compose profiles,
//! profiles fetch data through `lookup` and configure plain modules. This
//! crate checks that every class, define and node respects its layer.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | WS001 | `wmf-styleguide` | Enforces the profile/role architecture and node conventions |
//!
//! ## Usage
//!
//! ```ignore
//! use styleguide_lint_core::{Analyzer, Config};
//! use styleguide_lint_rules::WmfStyleguide;
//!
//! let config = Config::from_file(Path::new("styleguide-lint.toml"))?;
//! let analyzer = Analyzer::builder()
//!     .root("./manifests")
//!     .rule(WmfStyleguide::with_config(config.styleguide.clone()))
//!     .config(config)
//!     .fix(true)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod class;
mod deprecation;
mod fix;
mod lookup;
mod node;
mod notify;
mod profile;
mod role;
mod styleguide;

pub use fix::{fix_violation, normalize_node_regex, NodeRegexFix};
pub use notify::MESSAGE_PREFIX;
pub use styleguide::{WmfStyleguide, CODE, NAME};

/// Re-export core types for convenience.
pub use styleguide_lint_core::{Rule, RuleBox, Severity, StyleguideConfig, Violation};

/// Returns every available rule, configured with `config`.
#[must_use]
pub fn all_rules(config: &StyleguideConfig) -> Vec<RuleBox> {
    vec![Box::new(WmfStyleguide::with_config(config.clone()))]
}
