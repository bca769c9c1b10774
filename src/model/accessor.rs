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

//! Accessor resolution contracts
//!
//! The navigator never inspects values itself. For every step it asks an
//! [`AccessorResolver`] for a capability bound to the owner's type and member
//! name, then invokes that capability on the owner instance.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::types::TypeInfo;
use super::value::Value;

/// Result type for accessor invocations
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised by an accessor while reading or writing an instance
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// Accessor was invoked on a value of the wrong shape
    #[error("expected {expected}, got {actual}")]
    OwnerMismatch {
        /// Expected owner type
        expected: String,
        /// Actual owner type
        actual: String,
    },

    /// Selector kind does not fit the container
    #[error("{selector} cannot select from {container}")]
    SelectorMismatch {
        /// Selector description
        selector: String,
        /// Container type
        container: String,
    },

    /// Accessor-specific failure
    #[error("{message}")]
    Failed {
        /// Error message
        message: String,
    },
}

/// Element selector for container access
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Position in an ordered container
    Index(usize),
    /// Key in a key/value container
    Key(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(index) => write!(f, "[{index}]"),
            Selector::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Capability to read one named member of an owner type
pub trait ReadAccessor: fmt::Debug + Send + Sync {
    /// Declared type of the member
    fn declared_type(&self) -> &TypeInfo;

    /// Erased class of the member
    fn declared_class(&self) -> &str {
        self.declared_type().class_name()
    }

    /// Read the member from `owner`
    fn read(&self, owner: &Value) -> AccessResult<Value>;
}

/// Capability to write one named member of an owner type
pub trait WriteAccessor: fmt::Debug + Send + Sync {
    /// Declared type of the member; incoming values are converted to it
    fn declared_type(&self) -> &TypeInfo;

    /// Erased class of the member
    fn declared_class(&self) -> &str {
        self.declared_type().class_name()
    }

    /// Write the member on `owner`, returning the value it held before
    fn write(&self, owner: &Value, value: Value) -> AccessResult<Value>;
}

/// Indexed/mapped get and put on a container instance
pub trait ElementAccessor: fmt::Debug + Send + Sync {
    /// Read the selected element; absent elements are `Null`
    fn get(&self, container: &Value, selector: &Selector) -> AccessResult<Value>;

    /// Replace the selected element, returning the element previously there
    fn put(&self, container: &Value, selector: &Selector, value: Value) -> AccessResult<Value>;
}

/// Maps (owner type, member name) to read/write capabilities
///
/// Implementations must be safe to call concurrently; the navigator shares a
/// single resolver across all callers.
pub trait AccessorResolver: Send + Sync {
    /// Resolve a read capability for `member` on `owner`
    fn resolve_read(&self, owner: &TypeInfo, member: &str) -> Option<Arc<dyn ReadAccessor>>;

    /// Resolve a write capability for `member` on `owner`
    fn resolve_write(&self, owner: &TypeInfo, member: &str) -> Option<Arc<dyn WriteAccessor>>;

    /// Resolve element access for a container type
    fn resolve_element(&self, container: &TypeInfo) -> Option<Arc<dyn ElementAccessor>>;
}

/// Element access for the built-in `List` and `Map` values
///
/// Out-of-range index reads yield `Null`; index writes past the end grow the
/// list, up to [`MAX_LIST_PADDING`](super::value::MAX_LIST_PADDING) slots.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionElements;

impl ElementAccessor for CollectionElements {
    fn get(&self, container: &Value, selector: &Selector) -> AccessResult<Value> {
        match (container, selector) {
            (Value::List(list), Selector::Index(index)) => Ok(list.get(*index).unwrap_or_default()),
            (Value::Map(map), Selector::Key(key)) => Ok(map.get(key).unwrap_or_default()),
            (Value::List(_) | Value::Map(_), selector) => Err(AccessError::SelectorMismatch {
                selector: selector.to_string(),
                container: container.type_name(),
            }),
            (other, _) => Err(AccessError::OwnerMismatch {
                expected: "List or Map".to_string(),
                actual: other.type_name(),
            }),
        }
    }

    fn put(&self, container: &Value, selector: &Selector, value: Value) -> AccessResult<Value> {
        match (container, selector) {
            (Value::List(list), Selector::Index(index)) => list.set(*index, value),
            (Value::Map(map), Selector::Key(key)) => Ok(map.insert(key.clone(), value)),
            (Value::List(_) | Value::Map(_), selector) => Err(AccessError::SelectorMismatch {
                selector: selector.to_string(),
                container: container.type_name(),
            }),
            (other, _) => Err(AccessError::OwnerMismatch {
                expected: "List or Map".to_string(),
                actual: other.type_name(),
            }),
        }
    }
}
