//! Rules for plain classes and defined types.
//!
//! Outside of profiles and roles, code must stay inside its own module.

use styleguide_lint_core::predicates::{module_of, normalize_name};
use styleguide_lint_core::{Resource, StyleguideConfig};

use crate::lookup::check_no_lookups;
use crate::notify::Notifier;
use crate::profile::check_role_declarations;

pub(crate) fn check_plain_class(
    res: &Resource<'_>,
    config: &StyleguideConfig,
    out: &mut Notifier<'_, '_>,
) {
    check_no_lookups(res, out);
    check_includes(res, out);
    check_declared_classes(res, out);
    check_role_declarations(res, config, out);
}

pub(crate) fn check_define(
    res: &Resource<'_>,
    config: &StyleguideConfig,
    out: &mut Notifier<'_, '_>,
) {
    check_no_lookups(res, out);
    // Defines in the profile module wrap classes from anywhere.
    if res.module_name() != config.profile_module {
        check_declared_classes(res, out);
    }
}

fn check_includes(res: &Resource<'_>, out: &mut Notifier<'_, '_>) {
    let name = res.name();
    let module = res.module_name();
    for included in res.included_classes() {
        let class = normalize_name(included.text());
        if module_of(class) != module {
            out.error(
                included,
                format!("class '{name}' includes {class} from another module"),
            );
        }
    }
}

fn check_declared_classes(res: &Resource<'_>, out: &mut Notifier<'_, '_>) {
    let label = res.type_label();
    let name = res.name();
    let module = res.module_name();
    for declared in res.declared_classes() {
        let class = normalize_name(declared.text());
        // A define declaring a class without a module part is never flagged.
        if res.is_define() && !class.contains("::") {
            continue;
        }
        if module_of(class) != module {
            out.error(
                declared,
                format!("{label} '{name}' declares class {class} from another module"),
            );
        }
    }
}
