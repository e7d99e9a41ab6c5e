//! Rules for profile classes.
//!
//! Profiles are the only layer allowed to fetch data, and only through
//! their parameter defaults: every parameter must default to a `lookup`
//! call and no lookup may happen in the body.

use styleguide_lint_core::predicates::{
    is_legacy_lookup_call, is_lookup_call, module_of, normalize_name,
};
use styleguide_lint_core::{Resource, StyleguideConfig, TokenRef};

use crate::lookup::key_suffix;
use crate::notify::Notifier;

pub(crate) fn check(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    check_params(res, out);
    check_body_lookups(res, out);
    check_includes(res, config, out);
    check_role_declarations(res, config, out);
}

fn check_params(res: &Resource<'_>, out: &mut Notifier<'_, '_>) {
    let name = res.name();
    let stream = res.stream();
    for param in res.params().iter() {
        let value: Vec<TokenRef<'_>> = param.value.iter().filter_map(|i| stream.get(*i)).collect();
        if value.iter().any(|t| is_lookup_call(*t)) {
            continue;
        }
        let Some(declared) = stream.get(param.token) else {
            continue;
        };
        match value.iter().find(|t| is_legacy_lookup_call(**t)) {
            Some(legacy) => out.error(
                declared,
                format!(
                    "Parameter '{}' of class '{name}' uses deprecated {}, use lookup instead",
                    param.name,
                    legacy.text()
                ),
            ),
            None => out.error(
                declared,
                format!(
                    "Parameter '{}' of class '{name}' has no call to lookup",
                    param.name
                ),
            ),
        }
    }
}

fn check_body_lookups(res: &Resource<'_>, out: &mut Notifier<'_, '_>) {
    let name = res.name();
    let params = res.params();
    for call in res.tokens() {
        if !(is_lookup_call(call) || is_legacy_lookup_call(call)) {
            continue;
        }
        if params.in_default_value(call.index()) {
            continue;
        }
        out.error(
            call,
            format!(
                "Found {} call in class '{name}' outside of parameter defaults{}",
                call.text(),
                key_suffix(call)
            ),
        );
    }
}

fn check_includes(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    let name = res.name();
    for included in res.included_classes() {
        let class = normalize_name(included.text());
        let module = module_of(class);
        let allowed = module == config.profile_module
            || config.profile_include_modules.iter().any(|m| m == module)
            || config.profile_include_classes.iter().any(|c| c == class);
        if !allowed {
            out.error(
                included,
                format!("profile '{name}' includes non-profile class {class}"),
            );
        }
    }
}

/// Only roles may declare the role resource.
pub(crate) fn check_role_declarations(
    res: &Resource<'_>,
    config: &StyleguideConfig,
    out: &mut Notifier<'_, '_>,
) {
    let name = res.name();
    for declaration in res.find_resources(&config.role_resource) {
        out.error(
            declaration,
            format!(
                "class '{name}' declares {}, which should only be used in roles",
                config.role_resource
            ),
        );
    }
}
