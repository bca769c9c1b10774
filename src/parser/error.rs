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

//! Parse errors for path expressions

use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// A path string that violates the path grammar
///
/// Positions are byte offsets into the parsed string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The path string is empty
    #[error("Path is empty")]
    Empty,

    /// A segment has no name (leading, trailing or doubled separator)
    #[error("Empty segment at position {position}")]
    EmptySegment {
        /// Position where a segment name was expected
        position: usize,
    },

    /// A `[` without matching `]`
    #[error("Unterminated bracket starting at position {position}")]
    UnterminatedBracket {
        /// Position of the opening bracket
        position: usize,
    },

    /// Bracket content is neither a non-negative integer nor a quoted key
    #[error("Invalid index '{value}' at position {position}")]
    InvalidIndex {
        /// The offending index text
        value: String,
        /// Position of the index
        position: usize,
    },

    /// A quoted string without closing quote
    #[error("Unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Position of the opening quote
        position: usize,
    },

    /// Unknown escape sequence inside a quoted string
    #[error("Invalid escape sequence '\\{sequence}' at position {position}")]
    InvalidEscape {
        /// Escaped character
        sequence: char,
        /// Position of the backslash
        position: usize,
    },

    /// A `(` without matching `)`
    #[error("Unclosed argument list starting at position {position}")]
    UnclosedArguments {
        /// Position of the opening parenthesis
        position: usize,
    },

    /// A function argument that is not a literal
    #[error("Invalid argument '{value}' at position {position}")]
    InvalidArgument {
        /// The offending argument text
        value: String,
        /// Position of the argument
        position: usize,
    },

    /// A character that does not belong at this position
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The unexpected character
        character: char,
        /// Position of the character
        position: usize,
    },
}

impl ParseError {
    /// Byte offset the error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Empty => None,
            ParseError::EmptySegment { position }
            | ParseError::UnterminatedBracket { position }
            | ParseError::InvalidIndex { position, .. }
            | ParseError::UnclosedString { position }
            | ParseError::InvalidEscape { position, .. }
            | ParseError::UnclosedArguments { position }
            | ParseError::InvalidArgument { position, .. }
            | ParseError::UnexpectedCharacter { position, .. } => Some(*position),
        }
    }
}
