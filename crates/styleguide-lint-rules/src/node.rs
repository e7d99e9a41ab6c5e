//! Rules for node blocks.
//!
//! A node only assigns a role, so its body may contain almost nothing, and
//! it must match hosts by an anchored regex without spelling out the domain.

use styleguide_lint_core::predicates::{
    declared_class_of, included_class_of, is_declared_resource_type, is_legacy_lookup_call,
    is_lookup_call, normalize_name,
};
use styleguide_lint_core::{Resource, StyleguideConfig, TokenKind, TokenRef};

use crate::fix::{ends_with_anchor, find_domain, split_delimiters, NodeRegexFix};
use crate::notify::Notifier;

pub(crate) fn check(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    check_body(res, config, out);
    for title in res.title_tokens() {
        check_title(title, config, out);
    }
}

fn check_body(res: &Resource<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    let title = res.title();
    for token in res.tokens() {
        if is_lookup_call(token) {
            out.error(token, format!("Found lookup call in node '{title}'"));
        } else if is_legacy_lookup_call(token) {
            out.error(
                token,
                format!("Found deprecated {} call in node '{title}'", token.text()),
            );
        } else if let Some(class) = included_class_of(token) {
            out.error(
                class,
                format!("node '{title}' includes class {}", normalize_name(class.text())),
            );
        } else if let Some(class) = declared_class_of(token) {
            out.error(
                class,
                format!("node '{title}' declares class {}", normalize_name(class.text())),
            );
        } else if is_declared_resource_type(token) {
            let resource = normalize_name(token.text());
            if !config.node_allowed_resources.iter().any(|r| r == resource) {
                out.error(token, format!("node '{title}' declares {resource}"));
            }
        }
    }
}

fn check_title(title: TokenRef<'_>, config: &StyleguideConfig, out: &mut Notifier<'_, '_>) {
    let text = title.text();
    if title.kind() != TokenKind::Regex {
        out.error(title, format!("node definition must use a regex, got: {text}"));
        return;
    }

    let (_, body, _) = split_delimiters(text);
    if !body.starts_with('^') {
        out.fixable(
            title,
            format!("node regex must match from the start, add ^: {text}"),
            NodeRegexFix::AnchorStart,
        );
    }
    if ends_with_anchor(body) {
        out.fixable(
            title,
            format!("node regex must not be anchored at the end, remove $: {text}"),
            NodeRegexFix::DropEndAnchor,
        );
    }
    let domains = &config.disallowed_node_domains;
    if let Some(domain) = find_domain(body, domains) {
        let message = format!("node regex must not contain the {domain} domain: {text}");
        let fix = NodeRegexFix::StripDomain;
        if fix.apply(text, domains) == text {
            out.error(title, message);
        } else {
            out.fixable(title, message, fix);
        }
    }
}
