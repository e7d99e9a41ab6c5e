//! Node regex normalisation.
//!
//! Node regexes must be anchored at the start, must not be anchored at the
//! end and must not spell out the site's domain. Each problem has its own fix
//! so a violation can be resolved on its own. Every fix is idempotent.
//!
//! Token text is accepted with or without the surrounding `/` delimiters;
//! delimiters are preserved.

use styleguide_lint_core::{Edit, FixError, TokenKind, TokenStream, Violation};

/// The fixable node regex problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRegexFix {
    /// Prepend a missing `^`.
    AnchorStart,
    /// Drop a trailing `$`.
    DropEndAnchor,
    /// Strip a trailing disallowed domain.
    StripDomain,
}

impl NodeRegexFix {
    /// Every fix, in the order they are checked.
    pub const ALL: [Self; 3] = [Self::AnchorStart, Self::DropEndAnchor, Self::StripDomain];

    /// Tag stored in [`Violation::fix_tag`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::AnchorStart => "node_regex_start",
            Self::DropEndAnchor => "node_regex_end",
            Self::StripDomain => "node_regex_domain",
        }
    }

    /// Parses a tag back into a fix.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|fix| fix.tag() == tag)
    }

    /// Applies this fix to regex token text.
    #[must_use]
    pub fn apply(self, text: &str, domains: &[String]) -> String {
        let (open, body, close) = split_delimiters(text);
        let body = match self {
            Self::AnchorStart => {
                if body.starts_with('^') {
                    body.to_string()
                } else {
                    format!("^{body}")
                }
            }
            Self::DropEndAnchor => strip_end_anchors(body).to_string(),
            Self::StripDomain => strip_domains(body, domains),
        };
        format!("{open}{body}{close}")
    }
}

/// Applies every node regex fix.
#[must_use]
pub fn normalize_node_regex(text: &str, domains: &[String]) -> String {
    NodeRegexFix::ALL
        .into_iter()
        .fold(text.to_string(), |text, fix| fix.apply(&text, domains))
}

/// Computes the edit for a violation carrying a node regex fix tag.
///
/// # Errors
///
/// Fails if the violation has no tag, an unknown tag, no token, or points
/// at something other than a regex literal.
pub fn fix_violation(
    stream: &TokenStream,
    violation: &Violation,
    domains: &[String],
) -> Result<Edit, FixError> {
    let tag = violation
        .fix_tag
        .as_deref()
        .ok_or_else(|| FixError::NotFixable {
            message: violation.message.clone(),
        })?;
    let fix = NodeRegexFix::from_tag(tag).ok_or_else(|| FixError::Unsupported {
        tag: tag.to_string(),
    })?;
    let index = violation.token.ok_or_else(|| FixError::MissingToken {
        message: violation.message.clone(),
    })?;
    let token = stream
        .get(index)
        .ok_or(FixError::TokenOutOfRange { index })?;
    if token.kind() != TokenKind::Regex {
        return Err(FixError::WrongToken {
            index,
            tag: tag.to_string(),
        });
    }

    Ok(Edit::new(index, fix.apply(token.text(), domains)))
}

/// Regex body with its `/` delimiters split off, if present.
pub(crate) fn split_delimiters(text: &str) -> (&str, &str, &str) {
    if text.len() >= 2 && text.starts_with('/') && text.ends_with('/') {
        ("/", &text[1..text.len() - 1], "/")
    } else {
        ("", text, "")
    }
}

/// Returns true if the body ends with an unescaped `$`.
///
/// The `$` is escaped only by an odd run of backslashes: `a\\$` ends with a
/// literal backslash followed by an anchor.
pub(crate) fn ends_with_anchor(body: &str) -> bool {
    let Some(rest) = body.strip_suffix('$') else {
        return false;
    };
    let backslashes = rest.len() - rest.trim_end_matches('\\').len();
    backslashes % 2 == 0
}

fn strip_end_anchors(mut body: &str) -> &str {
    while ends_with_anchor(body) {
        body = &body[..body.len() - 1];
    }
    body
}

/// Regex spellings of a domain: escaped dots first, then literal.
pub(crate) fn domain_forms(domain: &str) -> [String; 2] {
    [domain.replace('.', "\\."), domain.to_string()]
}

/// Whether a domain starting right after `before` starts a host segment.
fn starts_segment(before: &str) -> bool {
    before.is_empty() || before == "^" || before.ends_with('.')
}

/// The first disallowed domain appearing as whole segments anywhere in the body.
pub(crate) fn find_domain<'d>(body: &str, domains: &'d [String]) -> Option<&'d str> {
    domains
        .iter()
        .find(|d| {
            domain_forms(d).iter().any(|form| {
                body.match_indices(form.as_str()).any(|(at, _)| starts_segment(&body[..at]))
            })
        })
        .map(String::as_str)
}

fn strip_domains(body: &str, domains: &[String]) -> String {
    let mut body = body.to_string();
    loop {
        let trimmed = strip_end_anchors(&body);
        let stripped = domains
            .iter()
            .flat_map(|d| domain_forms(d))
            .find_map(|form| {
                trimmed
                    .strip_suffix(form.as_str())
                    .filter(|rest| starts_segment(rest))
            })
            .map(str::to_string);
        match stripped {
            Some(next) => body = next,
            None => return body,
        }
    }
}
