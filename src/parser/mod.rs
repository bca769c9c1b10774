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

//! Path string parser
//!
//! Grammar:
//!
//! ```text
//! path     := segment ('.' segment)*
//! segment  := ident ( '[' index ']' | '[' quoted ']' | '(' args? ')' )?
//! args     := literal (',' literal)*
//! literal  := quoted | integer | decimal | 'true' | 'false' | 'null'
//! ```
//!
//! Whitespace is accepted only inside brackets and argument lists.

#![warn(missing_docs)]

pub mod error;
pub mod path_parser;
pub mod span;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use path_parser::parse_path;
pub use span::Spanned;
pub use tokenizer::{Token, Tokenizer};

/// Parse a path string into a [`PathExpression`](crate::path::PathExpression)
pub fn parse(input: &str) -> ParseResult<crate::path::PathExpression> {
    parse_path(input)
}
