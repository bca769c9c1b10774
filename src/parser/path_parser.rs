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

//! Recursive-descent parser turning tokens into path segments

use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::str::FromStr;

use super::error::{ParseError, ParseResult};
use super::span::Spanned;
use super::tokenizer::{Token, Tokenizer};
use crate::model::Value;
use crate::path::{PathExpression, Segment};

/// Parse a path string into a [`PathExpression`]
pub fn parse_path(input: &str) -> ParseResult<PathExpression> {
    let segments = PathParser::new(input)?.parse_segments()?;
    Ok(PathExpression::from_segments(input, segments))
}

struct PathParser<'input> {
    input: &'input str,
    tokens: Vec<Spanned<Token<'input>>>,
    index: usize,
    /// End of the last token consumed at segment level
    cursor: usize,
}

impl<'input> PathParser<'input> {
    fn new(input: &'input str) -> ParseResult<Self> {
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self {
            input,
            tokens: Tokenizer::new(input).tokenize_all()?,
            index: 0,
            cursor: 0,
        })
    }

    fn peek(&self) -> Option<&Spanned<Token<'input>>> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Spanned<Token<'input>>> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn unexpected_at(&self, position: usize) -> ParseError {
        match self.input[position..].chars().next() {
            Some(character) => ParseError::UnexpectedCharacter {
                character,
                position,
            },
            None => ParseError::EmptySegment { position },
        }
    }

    /// Segment-level tokens must follow each other without whitespace
    fn ensure_adjacent(&self, token: &Spanned<Token<'input>>) -> ParseResult<()> {
        if token.start == self.cursor {
            Ok(())
        } else {
            Err(self.unexpected_at(self.cursor))
        }
    }

    fn parse_segments(&mut self) -> ParseResult<Vec<Segment>> {
        let mut segments = Vec::new();

        loop {
            segments.push(self.parse_segment()?);

            let Some(next) = self.advance() else {
                break;
            };
            match next.value {
                Token::Dot => {
                    self.ensure_adjacent(&next)?;
                    self.cursor = next.end;
                }
                _ => {
                    return Err(if next.start == self.cursor {
                        self.unexpected_at(next.start)
                    } else {
                        self.unexpected_at(self.cursor)
                    });
                }
            }
        }

        Ok(segments)
    }

    fn parse_segment(&mut self) -> ParseResult<Segment> {
        let Some(token) = self.advance() else {
            return Err(ParseError::EmptySegment {
                position: self.cursor,
            });
        };

        let name = match token.value {
            Token::Identifier(name) => {
                self.ensure_adjacent(&token)?;
                name.to_string()
            }
            Token::Dot => {
                return Err(ParseError::EmptySegment {
                    position: token.start,
                });
            }
            _ => return Err(self.unexpected_at(self.cursor)),
        };
        self.cursor = token.end;

        let opener = match self.peek() {
            Some(next) if next.start == self.cursor => match next.value {
                Token::LeftBracket | Token::LeftParen => Some(next.value.clone()),
                _ => None,
            },
            _ => None,
        };

        match opener {
            Some(Token::LeftBracket) => self.parse_selector(name),
            Some(Token::LeftParen) => self.parse_arguments(name),
            _ => Ok(Segment::Property { name }),
        }
    }

    fn parse_selector(&mut self, name: String) -> ParseResult<Segment> {
        let open = self.cursor;
        self.advance();

        let Some(content) = self.advance() else {
            return Err(ParseError::UnterminatedBracket { position: open });
        };

        let segment = match content.value {
            Token::Integer(raw) => {
                let index = raw
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidIndex {
                        value: raw.to_string(),
                        position: content.start,
                    })?;
                Segment::Indexed { name, index }
            }
            Token::String(key) => Segment::Mapped {
                name,
                key: key.into_owned(),
            },
            Token::RightBracket => {
                return Err(ParseError::InvalidIndex {
                    value: String::new(),
                    position: content.start,
                });
            }
            _ => {
                return Err(ParseError::InvalidIndex {
                    value: self.input[content.start..content.end].to_string(),
                    position: content.start,
                });
            }
        };

        match self.advance() {
            Some(Spanned {
                value: Token::RightBracket,
                end,
                ..
            }) => {
                self.cursor = end;
                Ok(segment)
            }
            Some(other) => Err(self.unexpected_at(other.start)),
            None => Err(ParseError::UnterminatedBracket { position: open }),
        }
    }

    fn parse_arguments(&mut self, name: String) -> ParseResult<Segment> {
        let open = self.cursor;
        self.advance();
        let mut args: SmallVec<[Value; 2]> = SmallVec::new();

        let empty_end = match self.peek() {
            Some(Spanned {
                value: Token::RightParen,
                end,
                ..
            }) => Some(*end),
            _ => None,
        };
        if let Some(end) = empty_end {
            self.cursor = end;
            self.advance();
            return Ok(Segment::Function { name, args });
        }

        loop {
            let Some(token) = self.advance() else {
                return Err(ParseError::UnclosedArguments { position: open });
            };
            args.push(self.parse_literal(token)?);

            match self.advance() {
                Some(Spanned {
                    value: Token::Comma,
                    ..
                }) => continue,
                Some(Spanned {
                    value: Token::RightParen,
                    end,
                    ..
                }) => {
                    self.cursor = end;
                    return Ok(Segment::Function { name, args });
                }
                Some(other) => return Err(self.unexpected_at(other.start)),
                None => return Err(ParseError::UnclosedArguments { position: open }),
            }
        }
    }

    fn parse_literal(&self, token: Spanned<Token<'input>>) -> ParseResult<Value> {
        let invalid = || ParseError::InvalidArgument {
            value: self.input[token.start..token.end].to_string(),
            position: token.start,
        };

        match &token.value {
            Token::String(text) => Ok(Value::String(text.to_string())),
            Token::Integer(raw) => raw.parse::<i64>().map(Value::Integer).map_err(|_| invalid()),
            Token::Decimal(raw) => Decimal::from_str(raw)
                .map(Value::Decimal)
                .map_err(|_| invalid()),
            Token::Identifier("true") => Ok(Value::Boolean(true)),
            Token::Identifier("false") => Ok(Value::Boolean(false)),
            Token::Identifier("null") => Ok(Value::Null),
            Token::Identifier(_) => Err(invalid()),
            _ => Err(self.unexpected_at(token.start)),
        }
    }
}
