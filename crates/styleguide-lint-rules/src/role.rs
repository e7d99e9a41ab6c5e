//! Rules for role classes.
//!
//! A role only groups profiles and declares the role resource exactly once.

use styleguide_lint_core::predicates::{module_of, normalize_name};
use styleguide_lint_core::{Resource, StyleguideConfig};

use crate::lookup::check_no_lookups;
use crate::notify::Notifier;

pub(crate) fn check(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    check_no_lookups(res, out);
    check_includes(res, config, out);
    check_resources(res, config, out);
}

fn check_includes(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    let name = res.name();
    for included in res.included_classes() {
        let class = normalize_name(included.text());
        let module = module_of(class);
        if module != config.role_module && module != config.profile_module {
            out.error(
                included,
                format!("role '{name}' includes {class} which is neither a role nor a profile"),
            );
        }
    }
}

fn check_resources(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    let name = res.name();
    let role_resource = normalize_name(&config.role_resource);

    if res.find_resources(role_resource).len() != 1 {
        out.error_at_start(format!("role '{name}' should declare {role_resource} once"));
    }

    let others: Vec<&str> = res
        .declared_resources()
        .into_iter()
        .map(|t| normalize_name(t.text()))
        .filter(|t| *t != role_resource)
        .collect();
    if !others.is_empty() {
        out.error_at_start(format!(
            "role '{name}' should not declare resources other than {role_resource} (found: {})",
            others.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{check_source, messages};

    #[test]
    fn single_role_declaration_is_clean() {
        let v = check_source(
            "class role::db {\n  system::role { 'db': description => 'Database' }\n  include ::profile::db\n  include role::base\n}",
        );
        assert!(v.is_empty(), "{:?}", messages(&v));
    }

    #[test]
    fn missing_role_declaration() {
        let v = check_source("class role::db {\n  include profile::db\n}");
        assert_eq!(v.len(), 1);
        insta::assert_snapshot!(v[0].message, @"wmf-style: role 'role::db' should declare system::role once");
        assert_eq!((v[0].location.line, v[0].location.column), (1, 1));
    }

    #[test]
    fn duplicate_role_declaration_is_reported_once() {
        let v = check_source(
            "class role::db {\n  system::role { 'a': }\n  ::system::role { 'b': }\n}",
        );
        assert_eq!(
            messages(&v),
            vec!["wmf-style: role 'role::db' should declare system::role once"]
        );
    }

    #[test]
    fn other_resources_and_includes() {
        let v = check_source(
            "class role::db {\n\
             \x20 system::role { 'db': }\n\
             \x20 include mysql\n\
             \x20 file { '/etc/x': }\n\
             \x20 package { 'y': }\n\
             \x20 $k = lookup('k')\n\
             }",
        );
        assert_eq!(
            messages(&v),
            vec![
                "wmf-style: role 'role::db' should not declare resources other than system::role (found: file, package)",
                "wmf-style: role 'role::db' includes mysql which is neither a role nor a profile",
                "wmf-style: Found lookup call in class 'role::db' for 'k'",
            ]
        );
    }
}
