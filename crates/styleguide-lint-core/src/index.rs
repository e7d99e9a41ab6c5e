//! Resource index building: carves class, define and node blocks out of a
//! flat token stream.

use std::ops::{Range, RangeInclusive};

use crate::predicates::is_node_title_candidate;
use crate::token::{TokenKind, TokenRef, TokenStream};

/// Kind-specific payload of an indexed resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// `class name (...) { ... }`
    Class {
        /// Index of the name token.
        name: usize,
        /// Tokens between the parameter parentheses, if any.
        params: Option<Range<usize>>,
    },
    /// `define name (...) { ... }`
    DefinedType {
        /// Index of the name token.
        name: usize,
        /// Tokens between the parameter parentheses, if any.
        params: Option<Range<usize>>,
    },
    /// `node 'a', /b/ { ... }`
    Node {
        /// Literals making up the node's match expression.
        titles: Vec<usize>,
    },
}

/// A contiguous declaration: from its keyword to the matching closing brace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Index of the `class`/`define`/`node` keyword.
    pub start: usize,
    /// Index of the closing brace.
    pub end: usize,
    /// What was declared.
    pub kind: RecordKind,
}

impl ResourceRecord {
    /// Indexes of every token in the declaration.
    #[must_use]
    pub fn tokens(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Name token for classes and defines.
    #[must_use]
    pub fn name_token(&self) -> Option<usize> {
        match &self.kind {
            RecordKind::Class { name, .. } | RecordKind::DefinedType { name, .. } => Some(*name),
            RecordKind::Node { .. } => None,
        }
    }

    /// Parameter token range for classes and defines.
    #[must_use]
    pub fn param_tokens(&self) -> Option<Range<usize>> {
        match &self.kind {
            RecordKind::Class { params, .. } | RecordKind::DefinedType { params, .. } => {
                params.clone()
            }
            RecordKind::Node { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct NodeScan {
    in_node: bool,
    depth: usize,
    start: usize,
    titles: Vec<usize>,
}

/// Finds every node block in the stream.
///
/// Brace depth is tracked so resource bodies nested inside a node do not end
/// it. Title literals are collected from the tokens before the opening brace.
/// A node left open at end of stream yields no record.
#[must_use]
pub fn node_indexes(stream: &TokenStream) -> Vec<ResourceRecord> {
    let mut records = Vec::new();
    let mut scan = NodeScan::default();

    for token in stream.iter() {
        let index = token.index();
        match token.kind() {
            TokenKind::Node => {
                scan = NodeScan {
                    in_node: true,
                    depth: 0,
                    start: index,
                    titles: Vec::new(),
                };
            }
            TokenKind::LBrace if scan.in_node => {
                if scan.depth == 0 {
                    scan.titles = (scan.start..index)
                        .filter_map(|i| stream.get(i))
                        .filter(|t| is_node_title_candidate(*t))
                        .map(TokenRef::index)
                        .collect();
                }
                scan.depth += 1;
            }
            TokenKind::RBrace if scan.in_node && scan.depth > 0 => {
                scan.depth -= 1;
                if scan.depth == 0 {
                    records.push(ResourceRecord {
                        start: scan.start,
                        end: index,
                        kind: RecordKind::Node {
                            titles: std::mem::take(&mut scan.titles),
                        },
                    });
                    scan.in_node = false;
                }
            }
            _ => {}
        }
    }

    records
}

/// Finds every class and define definition in the stream.
///
/// Resource-like `class { 'name': }` declarations are not definitions.
/// Definitions whose braces never close are skipped.
#[must_use]
pub fn definition_indexes(stream: &TokenStream) -> Vec<ResourceRecord> {
    let mut records = Vec::new();

    for keyword in stream.iter() {
        let is_class = match keyword.kind() {
            TokenKind::Class => true,
            TokenKind::Define => false,
            _ => continue,
        };
        let Some(name) = keyword.next_code().filter(|t| t.kind() == TokenKind::Name) else {
            continue;
        };

        let mut cursor = name.next_code();
        let mut params = None;
        if let Some(open) = cursor.filter(|t| t.kind() == TokenKind::LParen) {
            let Some(close) = matching(open, TokenKind::LParen, TokenKind::RParen) else {
                continue;
            };
            params = Some(open.index() + 1..close.index());
            cursor = close.next_code();
        }

        // Skip over `inherits parent` to the body.
        while let Some(t) = cursor {
            if t.kind() == TokenKind::LBrace {
                break;
            }
            cursor = t.next_code();
        }
        let Some(body) = cursor else {
            continue;
        };
        let Some(end) = matching(body, TokenKind::LBrace, TokenKind::RBrace) else {
            continue;
        };

        let kind = if is_class {
            RecordKind::Class {
                name: name.index(),
                params,
            }
        } else {
            RecordKind::DefinedType {
                name: name.index(),
                params,
            }
        };
        records.push(ResourceRecord {
            start: keyword.index(),
            end: end.index(),
            kind,
        });
    }

    records
}

/// Walks code tokens from `open` to its balancing `close`.
fn matching(open: TokenRef<'_>, opener: TokenKind, closer: TokenKind) -> Option<TokenRef<'_>> {
    let mut depth = 0usize;
    let mut cursor = Some(open);
    while let Some(t) = cursor {
        if t.kind() == opener {
            depth += 1;
        } else if t.kind() == closer {
            depth -= 1;
            if depth == 0 {
                return Some(t);
            }
        }
        cursor = t.next_code();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tokenize;

    fn text(stream: &TokenStream, index: usize) -> &str {
        stream.get(index).map_or("", TokenRef::text)
    }

    #[test]
    fn node_with_nested_braces() {
        let s = tokenize(
            "node /^db\\d+/ {\n  file { '/x': ensure => present }\n  if $a { }\n}\nfile { 'after': }",
        );
        let nodes = node_indexes(&s);
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(s.get(node.start).unwrap().kind(), TokenKind::Node);
        assert_eq!(s.get(node.end).unwrap().line(), 4);
        let RecordKind::Node { titles } = &node.kind else {
            panic!("expected node record");
        };
        assert_eq!(titles.len(), 1);
        assert_eq!(text(&s, titles[0]), "^db\\d+");
    }

    #[test]
    fn multiple_nodes_and_titles() {
        let s = tokenize("node 'a', 'b' { }\nnode /c/ { include x }");
        let nodes = node_indexes(&s);
        assert_eq!(nodes.len(), 2);
        let RecordKind::Node { titles } = &nodes[0].kind else {
            panic!("expected node record");
        };
        let names: Vec<_> = titles.iter().map(|i| text(&s, *i)).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(nodes[0].name_token().is_none());
    }

    #[test]
    fn unterminated_node_is_dropped() {
        let s = tokenize("node 'a' { file { 'x': }");
        assert!(node_indexes(&s).is_empty());
    }

    #[test]
    fn node_without_titles() {
        let s = tokenize("node { }");
        let nodes = node_indexes(&s);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, RecordKind::Node { titles: vec![] });
    }

    #[test]
    fn classes_and_defines() {
        let s = tokenize(
            "class foo::bar (\n  $a = 1,\n) inherits foo {\n  class { 'x': }\n}\ndefine foo::baz { }",
        );
        let defs = definition_indexes(&s);
        assert_eq!(defs.len(), 2);

        let class = &defs[0];
        assert!(matches!(class.kind, RecordKind::Class { .. }));
        assert_eq!(text(&s, class.name_token().unwrap()), "foo::bar");
        let params = class.param_tokens().unwrap();
        assert!(params.clone().any(|i| text(&s, i) == "$a"));
        assert_eq!(s.get(class.end).unwrap().line(), 5);

        let define = &defs[1];
        assert!(matches!(define.kind, RecordKind::DefinedType { .. }));
        assert_eq!(text(&s, define.name_token().unwrap()), "foo::baz");
        assert!(define.param_tokens().is_none());
    }
}
