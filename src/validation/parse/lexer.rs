// Copyright 2023 Helsing GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{iter::Peekable, str::CharIndices};

use crate::validation::data::Position;

/// Kind of token produced by the [`Lexer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident(String),
    /// Single or double quoted string, with escapes resolved, and the byte length of its
    /// contents as written.
    String(String, usize),
    /// Template literal, contents are not retained.
    Template,
    /// Numeric literal.
    Number,
    /// `...`
    Spread,
    /// `=>`
    Arrow,
    /// Any other single character.
    Punct(char),
}

/// Token with its position in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    /// Whether this token is the punctuation character `c`.
    pub fn is(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

/// Tokenizer for JavaScript and TypeScript sources.
///
/// Only the tokens needed to find object literals are distinguished. Regular expression
/// literals are not recognized and lex as punctuation and identifiers.
pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peek at the character after the next one.
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn position(&mut self) -> Option<Position> {
        let offset = self.chars.peek()?.0;
        Some(Position::new(self.line, self.column, offset))
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            let position = self.position()?;
            let c = self.peek()?;

            let kind = match c {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.peek_second() == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.peek_second() == Some('*') => {
                    self.skip_block_comment();
                    continue;
                }
                '\'' | '"' => {
                    let (value, raw_len) = self.string();
                    TokenKind::String(value, raw_len)
                }
                '`' => {
                    self.template();
                    TokenKind::Template
                }
                c if c.is_ascii_digit() => {
                    self.take_while(|c| c.is_alphanumeric() || c == '.' || c == '_');
                    TokenKind::Number
                }
                c if is_ident_start(c) => TokenKind::Ident(self.take_while(is_ident_continue)),
                '.' if self.peek_second() == Some('.') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    ahead.next();
                    if ahead.next().map(|(_, c)| c) == Some('.') {
                        self.bump();
                        self.bump();
                        self.bump();
                        TokenKind::Spread
                    } else {
                        self.bump();
                        TokenKind::Punct('.')
                    }
                }
                '=' if self.peek_second() == Some('>') => {
                    self.bump();
                    self.bump();
                    TokenKind::Arrow
                }
                c => {
                    self.bump();
                    TokenKind::Punct(c)
                }
            };

            return Some(Token { kind, position });
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(c) = self.peek().filter(|&c| predicate(c)) {
            taken.push(c);
            self.bump();
        }
        taken
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        self.bump();
        self.bump();

        while let Some(c) = self.bump() {
            if c == '*' && self.peek() == Some('/') {
                self.bump();
                return;
            }
        }
    }

    /// Read a quoted string, an unescaped line break terminates it.
    ///
    /// Returns the value and the byte length of the contents between the quotes.
    fn string(&mut self) -> (String, usize) {
        let Some(quote) = self.bump() else {
            return (String::new(), 0);
        };

        let mut value = String::new();
        let mut raw_len = 0;

        while let Some(c) = self.peek() {
            if c == '\n' || c == quote {
                if c == quote {
                    self.bump();
                }
                break;
            }

            self.bump();
            raw_len += c.len_utf8();

            match c {
                '\\' => {
                    let Some(escaped) = self.bump() else {
                        break;
                    };
                    raw_len += escaped.len_utf8();

                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\n' => {}
                        escaped => value.push(escaped),
                    }
                }
                c => value.push(c),
            }
        }

        (value, raw_len)
    }

    /// Skip a template literal including nested `${ ... }` substitutions.
    fn template(&mut self) {
        self.bump();

        while let Some(c) = self.bump() {
            match c {
                '`' => return,
                '\\' => {
                    self.bump();
                }
                '$' if self.peek() == Some('{') => {
                    self.bump();
                    self.substitution();
                }
                _ => {}
            }
        }
    }

    fn substitution(&mut self) {
        let mut depth = 1usize;

        while let Some(c) = self.peek() {
            match c {
                '`' => self.template(),
                '\'' | '"' => {
                    self.string();
                }
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}
