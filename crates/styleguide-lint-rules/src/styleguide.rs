//! The `wmf-styleguide` check.
//!
//! Every class, define and node of a file is classified once and handed to
//! the rule set of its layer:
//!
//! | Classification | Rules |
//! |----------------|-------|
//! | profile | parameters default to `lookup`, no lookups in the body, restricted includes, no role resource |
//! | role | no lookups, only role/profile includes, exactly one role resource and nothing else |
//! | plain class | no lookups, includes and declared classes from its own module, no role resource |
//! | defined type | no lookups, declared classes from its own module unless it is a profile define |
//! | node | nearly empty body, anchored regex title without the domain |
//!
//! Classes and defines are also checked for deprecated functions and defines.
//!
//! # Fixes
//!
//! Node regex problems carry one of the [`NodeRegexFix`] tags and are fixed
//! by rewriting the regex token.

use styleguide_lint_core::{
    Classification, Edit, FileContext, FixError, Resource, Rule, Severity, StyleguideConfig,
    TokenStream, Violation,
};
use tracing::debug;

use crate::fix::{fix_violation, NodeRegexFix};
use crate::notify::Notifier;
use crate::{class, deprecation, node, profile, role};

/// Rule code for wmf-styleguide.
pub const CODE: &str = "WS001";

/// Rule name for wmf-styleguide.
pub const NAME: &str = "wmf-styleguide";

/// Checks manifests against the profile/role architecture.
#[derive(Debug, Clone, Default)]
pub struct WmfStyleguide {
    config: StyleguideConfig,
}

impl WmfStyleguide {
    /// Creates the check with the default module names and lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the check with the given conventions.
    #[must_use]
    pub fn with_config(config: StyleguideConfig) -> Self {
        Self { config }
    }

    /// The conventions being enforced.
    #[must_use]
    pub fn config(&self) -> &StyleguideConfig {
        &self.config
    }
}

impl Rule for WmfStyleguide {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces the profile/role architecture and node conventions"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut out = Notifier::new(ctx, self);
        let nodes = ctx.nodes();

        for record in ctx.definitions.iter().chain(&nodes) {
            let res = Resource::new(ctx.stream, record, &self.config);
            let classification = res.classification();
            debug!(
                "Checking {} '{}' as {:?}",
                res.type_label(),
                res.name(),
                classification
            );

            match classification {
                Classification::Profile => profile::check(&res, &self.config, &mut out),
                Classification::Role => role::check(&res, &self.config, &mut out),
                Classification::PlainClass => {
                    class::check_plain_class(&res, &self.config, &mut out);
                }
                Classification::DefinedType => class::check_define(&res, &self.config, &mut out),
                Classification::Node => node::check(&res, &self.config, &mut out),
            }
            if !res.is_node() {
                deprecation::check(&res, &self.config, &mut out);
            }
        }

        out.finish()
    }

    fn fix(&self, stream: &TokenStream, violation: &Violation) -> Result<Edit, FixError> {
        let edit = fix_violation(stream, violation, &self.config.disallowed_node_domains)?;
        debug!(
            "Fixing token {} with {:?}: {}",
            edit.token,
            violation.fix_tag.as_deref().and_then(NodeRegexFix::from_tag),
            edit.new_text
        );
        Ok(edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{check_source, check_with, messages};
    use std::path::Path;
    use styleguide_lint_core::testing::tokenize;

    #[test]
    fn rule_metadata() {
        let rule = WmfStyleguide::new();
        assert_eq!(rule.name(), "wmf-styleguide");
        assert_eq!(rule.code(), "WS001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.config().profile_module, "profile");
    }

    #[test]
    fn every_record_is_checked_independently() {
        let v = check_source(
            "class profile::a ($x) { }\n\
             class role::b { }\n\
             class c { include d }\n\
             node 'e' { }",
        );
        assert_eq!(
            messages(&v),
            vec![
                "wmf-style: role 'role::b' should declare system::role once",
                "wmf-style: Parameter 'x' of class 'profile::a' has no call to lookup",
                "wmf-style: class 'c' includes d from another module",
                "wmf-style: node definition must use a regex, got: e",
            ]
        );
        assert!(v.iter().all(|v| v.code == CODE && v.severity == Severity::Error));
    }

    #[test]
    fn custom_module_names() {
        let config = StyleguideConfig {
            profile_module: "prof".into(),
            role_module: "r".into(),
            ..StyleguideConfig::default()
        };
        let v = check_with(
            config,
            "class prof::db ($p = lookup('p')) { include prof::base }\n\
             class r::db { system::role { 'db': } include prof::db }",
        );
        assert!(v.is_empty(), "{:?}", messages(&v));
    }

    #[test]
    fn lookups_are_flagged_in_every_layer_but_profile_parameters() {
        let v = check_source(
            "class profile::a ($p = lookup('p')) { }\n\
             class role::b { system::role { 'b': } $x = lookup('x') }\n\
             class c { $y = lookup('y') }\n\
             define c::d { $z = lookup('z') }",
        );
        let lookups: Vec<_> = messages(&v)
            .into_iter()
            .filter(|m| m.contains("lookup call"))
            .collect();
        assert_eq!(
            lookups,
            vec![
                "wmf-style: Found lookup call in class 'role::b' for 'x'",
                "wmf-style: Found lookup call in class 'c' for 'y'",
                "wmf-style: Found lookup call in defined type 'c::d' for 'z'",
            ]
        );
    }

    #[test]
    fn fix_rewrites_node_regex() {
        let rule = WmfStyleguide::new();
        let mut stream = tokenize("node /test1.*\\.eqiad\\.wmnet$/ { }");
        let violations = {
            let ctx = FileContext::new(Path::new("site.pp"), &stream, Path::new("."));
            rule.check(&ctx)
        };
        assert_eq!(violations.len(), 3);
        for violation in &violations {
            let edit = rule.fix(&stream, violation).unwrap();
            assert!(stream.apply(&edit));
        }
        assert_eq!(stream.get(2).unwrap().text(), "^test1.*\\.eqiad\\.");

        let ctx = FileContext::new(Path::new("site.pp"), &stream, Path::new("."));
        assert!(rule.check(&ctx).is_empty());
    }

    #[test]
    fn unknown_fix_tag_is_an_error() {
        let rule = WmfStyleguide::new();
        let stream = tokenize("node /db1/ { }");
        let ctx = FileContext::new(Path::new("site.pp"), &stream, Path::new("."));
        let violation = ctx
            .violation_at(&rule, 2, "made up")
            .with_fix_tag("node_regex_middle");
        assert_eq!(
            rule.fix(&stream, &violation),
            Err(FixError::Unsupported {
                tag: "node_regex_middle".to_string()
            })
        );
    }
}
