//! Test support: a small manifest tokenizer.
//!
//! Real token streams come from the host lexer. This one understands just
//! enough of the language to write fixtures as source text: no heredocs, no
//! string interpolation, and `/` always opens a regex.

use crate::token::{Token, TokenKind, TokenStream};

/// Tokenizes `source` into a [`TokenStream`].
#[must_use]
pub fn tokenize(source: &str) -> TokenStream {
    TokenStream::new(Lexer::new(source).run())
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn take_while(&self, from: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut end = from;
        while end < self.chars.len() && pred(self.chars[end]) {
            end += 1;
        }
        end
    }

    /// Emits a token of `len` source chars with the given value.
    fn emit(&mut self, kind: TokenKind, text: String, len: usize) {
        self.tokens.push(Token::new(kind, text, self.line, self.column));
        for c in &self.chars[self.pos..self.pos + len] {
            if *c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
    }

    fn slice(&self, from: usize, to: usize) -> String {
        self.chars[from..to].iter().collect()
    }

    /// Scans a quoted literal, returning its content and source length.
    fn quoted(&self, quote: char) -> (String, usize) {
        let mut end = self.pos + 1;
        while end < self.chars.len() && self.chars[end] != quote {
            if self.chars[end] == '\\' {
                end += 1;
            }
            end += 1;
        }
        let close = end.min(self.chars.len());
        let content = self.slice(self.pos + 1, close);
        (content, (close + 1).min(self.chars.len()) - self.pos)
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => self.emit(TokenKind::Newline, "\n".into(), 1),
                ' ' | '\t' | '\r' => {
                    let end = self.take_while(self.pos, |c| matches!(c, ' ' | '\t' | '\r'));
                    let text = self.slice(self.pos, end);
                    self.emit(TokenKind::Whitespace, text, end - self.pos);
                }
                '#' => {
                    let end = self.take_while(self.pos, |c| c != '\n');
                    let text = self.slice(self.pos, end);
                    self.emit(TokenKind::Comment, text, end - self.pos);
                }
                '\'' => {
                    let (text, len) = self.quoted('\'');
                    self.emit(TokenKind::SString, text, len);
                }
                '"' => {
                    let (text, len) = self.quoted('"');
                    self.emit(TokenKind::String, text, len);
                }
                '/' => {
                    let (text, len) = self.quoted('/');
                    self.emit(TokenKind::Regex, text, len);
                }
                '$' => {
                    let end = self.take_while(self.pos + 1, is_name_char);
                    let text = self.slice(self.pos, end);
                    self.emit(TokenKind::Variable, text, end - self.pos);
                }
                '=' if self.peek(1) == Some('>') => self.emit(TokenKind::FArrow, "=>".into(), 2),
                '=' if matches!(self.peek(1), Some('=' | '~')) => {
                    let text = self.slice(self.pos, self.pos + 2);
                    self.emit(TokenKind::Other, text, 2);
                }
                '=' => self.emit(TokenKind::Equals, "=".into(), 1),
                '{' => self.emit(TokenKind::LBrace, "{".into(), 1),
                '}' => self.emit(TokenKind::RBrace, "}".into(), 1),
                '(' => self.emit(TokenKind::LParen, "(".into(), 1),
                ')' => self.emit(TokenKind::RParen, ")".into(), 1),
                '[' => self.emit(TokenKind::LBrack, "[".into(), 1),
                ']' => self.emit(TokenKind::RBrack, "]".into(), 1),
                ',' => self.emit(TokenKind::Comma, ",".into(), 1),
                ';' => self.emit(TokenKind::Semic, ";".into(), 1),
                ':' if self.peek(1) == Some(':') => self.word(),
                ':' => self.emit(TokenKind::Colon, ":".into(), 1),
                c if c.is_ascii_digit() => {
                    let end = self.take_while(self.pos, |c| c.is_ascii_alphanumeric() || c == '.');
                    let text = self.slice(self.pos, end);
                    self.emit(TokenKind::Number, text, end - self.pos);
                }
                c if c.is_alphabetic() || c == '_' => self.word(),
                other => self.emit(TokenKind::Other, other.to_string(), 1),
            }
        }
        self.tokens
    }

    fn word(&mut self) {
        let end = self.take_while(self.pos, is_name_char);
        let text = self.slice(self.pos, end);
        let kind = keyword(&text).unwrap_or_else(|| {
            if normalize(&text).starts_with(char::is_uppercase) {
                TokenKind::ClassRef
            } else {
                TokenKind::Name
            }
        });
        self.emit(kind, text, end - self.pos);
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

fn normalize(text: &str) -> &str {
    text.trim_start_matches(':')
}

fn keyword(text: &str) -> Option<TokenKind> {
    Some(match text {
        "class" => TokenKind::Class,
        "define" => TokenKind::Define,
        "node" => TokenKind::Node,
        "inherits" => TokenKind::Inherits,
        "if" => TokenKind::If,
        "elsif" => TokenKind::Elsif,
        "else" => TokenKind::Else,
        "unless" => TokenKind::Unless,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "undef" => TokenKind::Undef,
        _ => return None,
    })
}
