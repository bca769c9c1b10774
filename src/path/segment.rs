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

//! Path segments

use smallvec::SmallVec;
use std::fmt;

use crate::model::{Selector, Value};

/// One step of a path
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// `name`
    Property {
        /// Member name
        name: String,
    },
    /// `name[index]`
    Indexed {
        /// Member holding the list
        name: String,
        /// Zero-based position
        index: usize,
    },
    /// `name["key"]`
    Mapped {
        /// Member holding the map
        name: String,
        /// Entry key
        key: String,
    },
    /// `name(args)`
    Function {
        /// Function name as registered
        name: String,
        /// Literal arguments
        args: SmallVec<[Value; 2]>,
    },
}

impl Segment {
    /// Member or function name
    pub fn name(&self) -> &str {
        match self {
            Segment::Property { name }
            | Segment::Indexed { name, .. }
            | Segment::Mapped { name, .. }
            | Segment::Function { name, .. } => name,
        }
    }

    /// Element selector for indexed and mapped segments
    pub fn selector(&self) -> Option<Selector> {
        match self {
            Segment::Indexed { index, .. } => Some(Selector::Index(*index)),
            Segment::Mapped { key, .. } => Some(Selector::Key(key.clone())),
            _ => None,
        }
    }

    /// Function arguments; empty for other segment kinds
    pub fn args(&self) -> &[Value] {
        match self {
            Segment::Function { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether the segment is written with a call syntax
    pub fn is_function(&self) -> bool {
        matches!(self, Segment::Function { .. })
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    write!(f, "{quote}")?;
    for ch in text.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(text) => write_quoted(f, text, '\''),
        Value::Null => f.write_str("null"),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Property { name } => f.write_str(name),
            Segment::Indexed { name, index } => write!(f, "{name}[{index}]"),
            Segment::Mapped { name, key } => {
                write!(f, "{name}[")?;
                write_quoted(f, key, '"')?;
                f.write_str("]")
            }
            Segment::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_literal(f, arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
