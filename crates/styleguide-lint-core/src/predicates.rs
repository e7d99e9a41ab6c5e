//! Token classification using only local lookahead and lookback.
//!
//! Every predicate treats a missing neighbour (start or end of stream) as a
//! non-match.

use crate::token::{TokenKind, TokenRef};

/// Name of the current data lookup primitive.
pub const LOOKUP_FUNCTION: &str = "lookup";

/// Deprecated predecessors of [`LOOKUP_FUNCTION`].
pub const LEGACY_LOOKUP_FUNCTIONS: &[&str] = &["hiera", "hiera_array", "hiera_hash"];

/// Prefix shared by the legacy validation functions.
pub const LEGACY_VALIDATE_PREFIX: &str = "validate_";

/// Keywords that include a class as a statement.
pub const INCLUDE_KEYWORDS: &[&str] = &["include", "require", "contain"];

/// Strips the top-scope `::` prefix from a name.
#[must_use]
pub fn normalize_name(name: &str) -> &str {
    name.strip_prefix("::").unwrap_or(name)
}

/// Module of a name: the first `::` segment after normalisation.
#[must_use]
pub fn module_of(name: &str) -> &str {
    let name = normalize_name(name);
    name.split("::").next().unwrap_or(name)
}

/// A name or function name immediately followed by `(`.
#[must_use]
pub fn is_function_call(token: TokenRef<'_>) -> bool {
    matches!(token.kind(), TokenKind::Name | TokenKind::FunctionName)
        && token.next_code_is(TokenKind::LParen)
}

/// A call to one of the deprecated `hiera*` functions.
#[must_use]
pub fn is_legacy_lookup_call(token: TokenRef<'_>) -> bool {
    is_function_call(token) && LEGACY_LOOKUP_FUNCTIONS.contains(&token.text())
}

/// A call to `lookup`.
#[must_use]
pub fn is_lookup_call(token: TokenRef<'_>) -> bool {
    is_function_call(token) && token.text() == LOOKUP_FUNCTION
}

/// A call to one of the legacy `validate_*` functions.
#[must_use]
pub fn is_legacy_validate_call(token: TokenRef<'_>) -> bool {
    is_function_call(token) && token.text().starts_with(LEGACY_VALIDATE_PREFIX)
}

/// An `include`/`require`/`contain` statement.
///
/// `require => ...` used as a hash key or resource attribute is not a match.
#[must_use]
pub fn is_class_include(token: TokenRef<'_>) -> bool {
    token.kind() == TokenKind::Name
        && INCLUDE_KEYWORDS.contains(&token.text())
        && token
            .next_code()
            .is_some_and(|next| next.kind() != TokenKind::FArrow)
}

/// The token naming the class pulled in by an include statement.
#[must_use]
pub fn included_class_of(token: TokenRef<'_>) -> Option<TokenRef<'_>> {
    if !is_class_include(token) {
        return None;
    }
    let next = token.next_code()?;
    if next.kind() == TokenKind::LParen {
        next.next_code()
    } else {
        Some(next)
    }
}

/// The token naming the class in a resource-like `class { 'name': }`.
#[must_use]
pub fn declared_class_of(token: TokenRef<'_>) -> Option<TokenRef<'_>> {
    if token.kind() != TokenKind::Class {
        return None;
    }
    let brace = token.next_code()?;
    if brace.kind() != TokenKind::LBrace {
        return None;
    }
    brace.next_code()
}

/// A resource declaration such as `file { ... }` or `foo::bar { ... }`.
///
/// The name right after a `class`, `define`, `node` or `inherits` keyword is
/// a definition header rather than a resource type.
#[must_use]
pub fn is_declared_resource_type(token: TokenRef<'_>) -> bool {
    token.kind() == TokenKind::Name
        && token.next_code_is(TokenKind::LBrace)
        && !token.prev_code().is_some_and(|prev| {
            matches!(
                prev.kind(),
                TokenKind::Class | TokenKind::Define | TokenKind::Node | TokenKind::Inherits
            )
        })
}

/// A literal that can be part of a node's match expression.
#[must_use]
pub fn is_node_title_candidate(token: TokenRef<'_>) -> bool {
    matches!(
        token.kind(),
        TokenKind::String | TokenKind::SString | TokenKind::Name | TokenKind::Regex
    )
}
