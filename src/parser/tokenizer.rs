// Copyright 2024 OctoFHIR Team
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

//! Tokenizer for path strings
//!
//! Produces zero-copy tokens with byte spans. Whitespace is skipped here;
//! the parser decides where it is allowed by checking span adjacency.

use std::borrow::Cow;
use unicode_xid::UnicodeXID;

use super::error::{ParseError, ParseResult};
use super::span::Spanned;

/// Path token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    /// Identifier (segment name, or `true`/`false`/`null` inside arguments)
    Identifier(&'input str),
    /// Integer literal, possibly negative
    Integer(&'input str),
    /// Decimal literal, possibly negative
    Decimal(&'input str),
    /// Quoted string with escapes resolved
    String(Cow<'input, str>),
    /// `.`
    Dot,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
}

/// Byte-oriented scanner over a path string
pub struct Tokenizer<'input> {
    input: &'input str,
    position: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer over `input`
    pub fn new(input: &'input str) -> Self {
        Self { input, position: 0 }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    #[inline]
    fn is_identifier_start(ch: char) -> bool {
        ch == '_' || ch == '$' || UnicodeXID::is_xid_start(ch)
    }

    #[inline]
    fn is_identifier_continue(ch: char) -> bool {
        ch == '$' || UnicodeXID::is_xid_continue(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.position += ch.len_utf8();
        }
    }

    fn scan_identifier(&mut self) -> &'input str {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if !Self::is_identifier_continue(ch) {
                break;
            }
            self.position += ch.len_utf8();
        }
        &self.input[start..self.position]
    }

    fn scan_digits(&mut self) {
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() && bytes[self.position].is_ascii_digit() {
            self.position += 1;
        }
    }

    fn scan_number(&mut self) -> ParseResult<Token<'input>> {
        let start = self.position;
        let bytes = self.input.as_bytes();

        if bytes[self.position] == b'-' {
            self.position += 1;
            if !bytes.get(self.position).is_some_and(u8::is_ascii_digit) {
                return Err(ParseError::UnexpectedCharacter {
                    character: '-',
                    position: start,
                });
            }
        }

        self.scan_digits();

        let is_fraction = bytes.get(self.position) == Some(&b'.')
            && bytes.get(self.position + 1).is_some_and(u8::is_ascii_digit);
        if is_fraction {
            self.position += 1;
            self.scan_digits();
            Ok(Token::Decimal(&self.input[start..self.position]))
        } else {
            Ok(Token::Integer(&self.input[start..self.position]))
        }
    }

    fn scan_string(&mut self, quote: char) -> ParseResult<Cow<'input, str>> {
        let start = self.position;
        self.position += quote.len_utf8();
        let content_start = self.position;
        let mut unescaped: Option<String> = None;

        loop {
            let Some(ch) = self.peek_char() else {
                return Err(ParseError::UnclosedString { position: start });
            };

            if ch == quote {
                let raw = &self.input[content_start..self.position];
                self.position += ch.len_utf8();
                return Ok(match unescaped {
                    Some(owned) => Cow::Owned(owned),
                    None => Cow::Borrowed(raw),
                });
            }

            if ch == '\\' {
                let escape_at = self.position;
                self.position += 1;
                let Some(escaped) = self.peek_char() else {
                    return Err(ParseError::UnclosedString { position: start });
                };
                let resolved = match escaped {
                    '\\' => '\\',
                    '\'' => '\'',
                    '"' => '"',
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => {
                        return Err(ParseError::InvalidEscape {
                            sequence: other,
                            position: escape_at,
                        });
                    }
                };
                let buffer = unescaped
                    .get_or_insert_with(|| self.input[content_start..escape_at].to_string());
                buffer.push(resolved);
                self.position += escaped.len_utf8();
                continue;
            }

            if let Some(buffer) = unescaped.as_mut() {
                buffer.push(ch);
            }
            self.position += ch.len_utf8();
        }
    }

    /// Scan the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };

        let token = match ch {
            '.' => {
                self.position += 1;
                Token::Dot
            }
            '[' => {
                self.position += 1;
                Token::LeftBracket
            }
            ']' => {
                self.position += 1;
                Token::RightBracket
            }
            '(' => {
                self.position += 1;
                Token::LeftParen
            }
            ')' => {
                self.position += 1;
                Token::RightParen
            }
            ',' => {
                self.position += 1;
                Token::Comma
            }
            '\'' | '"' => Token::String(self.scan_string(ch)?),
            '-' | '0'..='9' => self.scan_number()?,
            c if Self::is_identifier_start(c) => Token::Identifier(self.scan_identifier()),
            other => {
                return Err(ParseError::UnexpectedCharacter {
                    character: other,
                    position: start,
                });
            }
        };

        Ok(Some(Spanned::new(token, start, self.position)))
    }

    /// Scan the whole input
    pub fn tokenize_all(mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::with_capacity(self.input.len() / 3 + 1);
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}
