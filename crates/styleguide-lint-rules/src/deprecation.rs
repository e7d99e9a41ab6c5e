//! Deprecated functions and defines, checked in every class and define.

use styleguide_lint_core::{Resource, StyleguideConfig};

use crate::notify::Notifier;

pub(crate) fn check(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    let label = res.type_label();
    let name = res.name();

    for call in res.legacy_validate_calls() {
        out.error(
            call,
            format!("Found legacy function ({}) call in {label} '{name}'", call.text()),
        );
    }

    for define in &config.deprecated_defines {
        if !res.find_resources(define).is_empty() {
            out.error_at_start(format!(
                "{label} '{name}' declares the deprecated define {define}"
            ));
        }
    }
}
