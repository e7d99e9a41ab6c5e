//! Pre-lexed token stream with precomputed code-token navigation.
//!
//! The stream is supplied by the host lexer. Neighbour links are computed
//! once when the stream is built and never change afterwards; only the
//! text of a token may be rewritten, through [`TokenStream::apply`].

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Edit;

/// Lexical category of a token.
///
/// Serialised with the tag names the host lexer uses (`NAME`, `LBRACE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Bare word, including qualified names such as `foo::bar`.
    Name,
    /// Name the lexer already recognised as a function call.
    FunctionName,
    /// `$variable`.
    Variable,
    /// Double-quoted string.
    String,
    /// Single-quoted string.
    #[serde(rename = "SSTRING")]
    SString,
    /// `/regex/` literal.
    Regex,
    /// Capitalised type or resource reference (`File`, `Integer`).
    #[serde(rename = "CLASSREF")]
    ClassRef,
    /// Numeric literal.
    Number,
    /// `{`
    #[serde(rename = "LBRACE")]
    LBrace,
    /// `}`
    #[serde(rename = "RBRACE")]
    RBrace,
    /// `(`
    #[serde(rename = "LPAREN")]
    LParen,
    /// `)`
    #[serde(rename = "RPAREN")]
    RParen,
    /// `[`
    #[serde(rename = "LBRACK")]
    LBrack,
    /// `]`
    #[serde(rename = "RBRACK")]
    RBrack,
    /// `,`
    Comma,
    /// `=`
    Equals,
    /// `=>`
    #[serde(rename = "FARROW")]
    FArrow,
    /// `:`
    Colon,
    /// `;`
    Semic,
    /// `class` keyword.
    Class,
    /// `define` keyword.
    Define,
    /// `node` keyword.
    Node,
    /// `inherits` keyword.
    Inherits,
    /// `if` keyword.
    If,
    /// `elsif` keyword.
    Elsif,
    /// `else` keyword.
    Else,
    /// `unless` keyword.
    Unless,
    /// `case` keyword.
    Case,
    /// `default` keyword.
    Default,
    /// `true` literal.
    True,
    /// `false` literal.
    False,
    /// `undef` literal.
    Undef,
    /// Spaces and tabs.
    Whitespace,
    /// Line break.
    Newline,
    /// Leading indentation.
    Indent,
    /// `# comment`
    Comment,
    /// `/* comment */`
    #[serde(rename = "MLCOMMENT")]
    MlComment,
    /// `// comment`
    SlashComment,
    /// Anything the engine never inspects (operators, heredocs, ...).
    #[serde(other)]
    Other,
}

impl TokenKind {
    /// Parses a host tag; unknown tags become [`TokenKind::Other`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let de: StrDeserializer<'_, ValueError> = tag.into_deserializer();
        Self::deserialize(de).unwrap_or(Self::Other)
    }

    /// The host tag of this kind.
    #[must_use]
    pub fn tag(self) -> String {
        match serde_json::to_value(self) {
            Ok(Value::String(tag)) => tag,
            _ => "OTHER".to_string(),
        }
    }

    /// Returns true for pure formatting: whitespace and comments.
    #[must_use]
    pub fn is_formatting(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Newline
                | Self::Indent
                | Self::Comment
                | Self::MlComment
                | Self::SlashComment
        )
    }
}

/// A single lexical unit as produced by the host lexer.
///
/// The host's kind tag and any fields the engine does not read are kept as
/// they were decoded, so a stream written back differs only in rewritten
/// token text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawToken", into = "RawToken")]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Token value. Strings and regexes carry their content without quotes.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    tag: String,
    extra: Map<String, Value>,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            tag: kind.tag(),
            extra: Map::new(),
        }
    }

    /// Kind tag as the host lexer wrote it, e.g. `DQPRE` for an [`TokenKind::Other`].
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Wire form of a [`Token`].
#[derive(Serialize, Deserialize)]
struct RawToken {
    kind: String,
    text: String,
    line: usize,
    column: usize,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        Self {
            kind: TokenKind::from_tag(&raw.kind),
            text: raw.text,
            line: raw.line,
            column: raw.column,
            tag: raw.kind,
            extra: raw.extra,
        }
    }
}

impl From<Token> for RawToken {
    fn from(token: Token) -> Self {
        // The public kind wins if it was changed after decoding.
        let kind = if TokenKind::from_tag(&token.tag) == token.kind {
            token.tag
        } else {
            token.kind.tag()
        };
        Self {
            kind,
            text: token.text,
            line: token.line,
            column: token.column,
            extra: token.extra,
        }
    }
}

/// An index-addressed token arena with O(1) code-token neighbour lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Token>", into = "Vec<Token>")]
pub struct TokenStream {
    tokens: Vec<Token>,
    next_code: Vec<Option<usize>>,
    prev_code: Vec<Option<usize>>,
}

impl TokenStream {
    /// Builds a stream and precomputes the neighbour links.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let len = tokens.len();
        let mut next_code = vec![None; len];
        let mut prev_code = vec![None; len];

        let mut last = None;
        for (i, token) in tokens.iter().enumerate() {
            prev_code[i] = last;
            if !token.kind.is_formatting() {
                last = Some(i);
            }
        }

        let mut following = None;
        for (i, token) in tokens.iter().enumerate().rev() {
            next_code[i] = following;
            if !token.kind.is_formatting() {
                following = Some(i);
            }
        }

        Self {
            tokens,
            next_code,
            prev_code,
        }
    }

    /// Number of tokens, formatting included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the stream holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns a cursor at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<TokenRef<'_>> {
        (index < self.tokens.len()).then_some(TokenRef {
            stream: self,
            index,
        })
    }

    /// Iterates over every token in order.
    pub fn iter(&self) -> impl Iterator<Item = TokenRef<'_>> + '_ {
        (0..self.tokens.len()).map(move |index| TokenRef {
            stream: self,
            index,
        })
    }

    /// Raw token slice.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Replaces the text of the token named by `edit`.
    ///
    /// Returns false, leaving the stream untouched, if the index is out of
    /// range. Kinds and positions never change, so neighbour links stay valid.
    pub fn apply(&mut self, edit: &Edit) -> bool {
        match self.tokens.get_mut(edit.token) {
            Some(token) => {
                token.text.clone_from(&edit.new_text);
                true
            }
            None => false,
        }
    }

    /// Consumes the stream, returning the owned tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl From<TokenStream> for Vec<Token> {
    fn from(stream: TokenStream) -> Self {
        stream.into_tokens()
    }
}

/// A borrowed cursor pointing at one token of a [`TokenStream`].
#[derive(Debug, Clone, Copy)]
pub struct TokenRef<'a> {
    stream: &'a TokenStream,
    index: usize,
}

impl<'a> TokenRef<'a> {
    /// Position of this token in the stream.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    /// The underlying token.
    #[must_use]
    pub fn token(self) -> &'a Token {
        &self.stream.tokens[self.index]
    }

    /// Lexical category.
    #[must_use]
    pub fn kind(self) -> TokenKind {
        self.token().kind
    }

    /// Token value.
    #[must_use]
    pub fn text(self) -> &'a str {
        &self.token().text
    }

    /// Line number (1-indexed).
    #[must_use]
    pub fn line(self) -> usize {
        self.token().line
    }

    /// Column number (1-indexed).
    #[must_use]
    pub fn column(self) -> usize {
        self.token().column
    }

    /// Nearest following token that is not formatting.
    #[must_use]
    pub fn next_code(self) -> Option<TokenRef<'a>> {
        self.stream.next_code[self.index].and_then(|i| self.stream.get(i))
    }

    /// Nearest preceding token that is not formatting.
    #[must_use]
    pub fn prev_code(self) -> Option<TokenRef<'a>> {
        self.stream.prev_code[self.index].and_then(|i| self.stream.get(i))
    }

    /// Returns true if the next code token has the given kind.
    #[must_use]
    pub fn next_code_is(self, kind: TokenKind) -> bool {
        self.next_code().is_some_and(|t| t.kind() == kind)
    }

    /// Returns true if the previous code token has the given kind.
    #[must_use]
    pub fn prev_code_is(self, kind: TokenKind) -> bool {
        self.prev_code().is_some_and(|t| t.kind() == kind)
    }
}
