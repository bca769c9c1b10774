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

//! Error types for path navigation

use thiserror::Error;

use crate::parser::ParseError;
use crate::registry::FunctionError;

/// Result type for navigation operations
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Errors that can occur while reading or writing through a path
///
/// Every error is fatal to the call that raised it. Null intermediates are
/// an error only under `FAIL_ON_NULL`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// The path string violates the grammar
    #[error("Malformed path '{path}': {source}")]
    MalformedPath {
        /// Path string as given
        path: String,
        /// Parser diagnosis
        #[source]
        source: ParseError,
    },

    /// A member or function cannot be resolved or invoked on an encountered type
    #[error("Cannot access '{member}' on {owner_type}: {reason}")]
    Access {
        /// Member or segment text
        member: String,
        /// Type of the owner value
        owner_type: String,
        /// What went wrong
        reason: String,
    },

    /// An intermediate value was null under `FAIL_ON_NULL`
    #[error("Segment '{segment}' of '{path}' is null on {owner_type}")]
    SegmentNull {
        /// Segment that produced null
        segment: String,
        /// Path up to and including the segment
        path: String,
        /// Type the member was read from
        owner_type: String,
    },

    /// A missing intermediate could not be instantiated
    #[error("Cannot create {type_name} for segment '{segment}': {reason}")]
    ObjectCreation {
        /// Segment being filled
        segment: String,
        /// Type that was requested
        type_name: String,
        /// Factory diagnosis
        reason: String,
    },

    /// A value cannot be converted to the required type
    #[error("Cannot convert {value_type} to {target_type}: {reason}")]
    Conversion {
        /// Type of the value
        value_type: String,
        /// Requested type
        target_type: String,
        /// Converter diagnosis
        reason: String,
    },

    /// A path function failed
    #[error("Function error: {0}")]
    Function(#[from] FunctionError),
}

impl NavigationError {
    /// Wrap a parse failure for `path`
    pub fn malformed(path: impl Into<String>, source: ParseError) -> Self {
        NavigationError::MalformedPath {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the target could not be reached
    ///
    /// Writes under `RETURN_NULL` tolerate these while reaching the parent of
    /// the final segment.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            NavigationError::Access { .. }
                | NavigationError::SegmentNull { .. }
                | NavigationError::ObjectCreation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = NavigationError::SegmentNull {
            segment: "address".to_string(),
            path: "address".to_string(),
            owner_type: "Person".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Segment 'address' of 'address' is null on Person"
        );

        let err = NavigationError::malformed("a..b", ParseError::EmptySegment { position: 2 });
        assert_eq!(
            err.to_string(),
            "Malformed path 'a..b': Empty segment at position 2"
        );
    }

    #[test]
    fn test_function_errors_convert() {
        let err: NavigationError = FunctionError::ReadOnly {
            name: "size".to_string(),
        }
        .into();
        assert!(matches!(err, NavigationError::Function(_)));
        assert!(!err.is_unreachable());
    }
}
