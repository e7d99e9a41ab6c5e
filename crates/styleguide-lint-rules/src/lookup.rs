//! Lookup checks shared by every class and define that is not a profile.

use styleguide_lint_core::predicates::{is_legacy_lookup_call, is_lookup_call};
use styleguide_lint_core::{Resource, TokenKind, TokenRef};

use crate::notify::Notifier;

/// ` for 'key'` when the call's first argument is a string literal.
pub(crate) fn key_suffix(call: TokenRef<'_>) -> String {
    call.next_code()
        .and_then(|paren| paren.next_code())
        .filter(|arg| matches!(arg.kind(), TokenKind::String | TokenKind::SString))
        .map(|arg| format!(" for '{}'", arg.text()))
        .unwrap_or_default()
}

/// Flags every lookup or legacy lookup call of the resource.
pub(crate) fn check_no_lookups(res: &Resource<'_>, out: &mut Notifier<'_, '_>) {
    let label = res.type_label();
    let name = res.name();
    for call in res.tokens() {
        if is_lookup_call(call) {
            out.error(
                call,
                format!("Found lookup call in {label} '{name}'{}", key_suffix(call)),
            );
        } else if is_legacy_lookup_call(call) {
            out.error(
                call,
                format!(
                    "Found deprecated {} call in {label} '{name}'{}, use lookup instead",
                    call.text(),
                    key_suffix(call)
                ),
            );
        }
    }
}
