//! Parameter list parsing for class and define headers.

use crate::token::{TokenKind, TokenStream};

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name without the `$` sigil.
    pub name: String,
    /// Index of the `$name` token that first declared it.
    pub token: usize,
    /// Code tokens of the default value, empty when there is none.
    pub value: Vec<usize>,
}

impl Param {
    /// Returns true if a default value was given.
    #[must_use]
    pub fn has_default(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Parameters in declaration order, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    params: Vec<Param>,
}

impl ParamMap {
    /// Looks up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameter was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns true if `token` belongs to some parameter's default value.
    #[must_use]
    pub fn in_default_value(&self, token: usize) -> bool {
        self.params.iter().any(|p| p.value.contains(&token))
    }

    fn entry(&mut self, name: &str, token: usize) -> usize {
        if let Some(pos) = self.params.iter().position(|p| p.name == name) {
            return pos;
        }
        self.params.push(Param {
            name: name.to_string(),
            token,
            value: Vec::new(),
        });
        self.params.len() - 1
    }
}

/// Parses the tokens between a header's parentheses.
///
/// A value runs from `=` to the next comma at nesting depth zero, so
/// `lookup('a', {'default_value' => 1})` stays in one value. Variables inside
/// a value are part of that value. A repeated name keeps its first declaring
/// token and takes the later value.
#[must_use]
pub fn parse_params(stream: &TokenStream, tokens: impl IntoIterator<Item = usize>) -> ParamMap {
    let mut map = ParamMap::default();
    let mut current: Option<usize> = None;
    let mut in_value = false;
    let mut depth = 0usize;

    for index in tokens {
        let Some(token) = stream.get(index) else {
            break;
        };
        let kind = token.kind();
        if kind.is_formatting() {
            continue;
        }

        if in_value && depth > 0 {
            match kind {
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            push_value(&mut map, current, index);
            continue;
        }

        match kind {
            TokenKind::Variable if !in_value => {
                let name = token.text().trim_start_matches('$');
                current = Some(map.entry(name, index));
            }
            TokenKind::Comma => {
                current = None;
                in_value = false;
            }
            TokenKind::Equals if !in_value => {
                if let Some(pos) = current {
                    map.params[pos].value.clear();
                }
                in_value = true;
            }
            _ => {
                if in_value {
                    if matches!(kind, TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace) {
                        depth += 1;
                    }
                    push_value(&mut map, current, index);
                }
            }
        }
    }

    map
}

fn push_value(map: &mut ParamMap, current: Option<usize>, index: usize) {
    if let Some(pos) = current {
        map.params[pos].value.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tokenize;

    fn parse(source: &str) -> (TokenStream, ParamMap) {
        let stream = tokenize(source);
        let map = parse_params(&stream, 0..stream.len());
        (stream, map)
    }

    fn value_text(stream: &TokenStream, param: &Param) -> Vec<String> {
        param
            .value
            .iter()
            .filter_map(|i| stream.get(*i))
            .map(|t| t.text().to_string())
            .collect()
    }

    #[test]
    fn empty_list_yields_empty_map() {
        let (_, map) = parse("");
        assert!(map.is_empty());
    }

    #[test]
    fn collects_names_and_values() {
        let (stream, map) = parse("$a, String $b = lookup('x'), $c = 3");
        let names: Vec<_> = map.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!map.get("a").unwrap().has_default());
        assert_eq!(
            value_text(&stream, map.get("b").unwrap()),
            vec!["lookup", "(", "x", ")"]
        );
        assert_eq!(value_text(&stream, map.get("c").unwrap()), vec!["3"]);
    }

    #[test]
    fn nested_commas_stay_in_value() {
        let (stream, map) =
            parse("$a = lookup('k', {'default_value' => [1, 2]}), $b = $::fqdn");
        assert_eq!(map.len(), 2);
        let a = value_text(&stream, map.get("a").unwrap());
        assert_eq!(a.first().map(String::as_str), Some("lookup"));
        assert_eq!(a.last().map(String::as_str), Some(")"));
        assert_eq!(value_text(&stream, map.get("b").unwrap()), vec!["$::fqdn"]);
        assert!(map.get("::fqdn").is_none());
    }

    #[test]
    fn repeated_name_keeps_first_token_and_last_value() {
        let (stream, map) = parse("$a = 1, $a = 2");
        assert_eq!(map.len(), 1);
        let a = map.get("a").unwrap();
        assert_eq!(stream.get(a.token).unwrap().column(), 1);
        assert_eq!(value_text(&stream, a), vec!["2"]);
    }

    #[test]
    fn comments_are_skipped() {
        let (stream, map) = parse("$a = # note\n  'x'");
        assert_eq!(value_text(&stream, map.get("a").unwrap()), vec!["x"]);
        assert!(map.in_default_value(map.get("a").unwrap().value[0]));
    }
}
