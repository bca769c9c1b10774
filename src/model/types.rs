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

//! Declared type descriptors for object graph members

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type information for values reachable in an object graph
///
/// The full `TypeInfo` is the member's *type* (e.g. `List<Integer>`), while
/// [`TypeInfo::class_name`] is its erased *class* (e.g. `List`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeInfo {
    /// Unknown or unconstrained type
    Any,
    /// Boolean value (true/false)
    Boolean,
    /// Integer numeric value
    Integer,
    /// Decimal numeric value with arbitrary precision
    Decimal,
    /// String value
    String,
    /// Date value (YYYY-MM-DD)
    Date,
    /// DateTime value with timezone offset
    DateTime,
    /// Time value (HH:MM:SS)
    Time,
    /// Ordered container with element type
    List(Box<TypeInfo>),
    /// String-keyed container with value type
    Map(Box<TypeInfo>),
    /// Named object class
    Object(String),
}

impl TypeInfo {
    /// Create a list type
    pub fn list(element_type: TypeInfo) -> Self {
        TypeInfo::List(Box::new(element_type))
    }

    /// Create a map type
    pub fn map(value_type: TypeInfo) -> Self {
        TypeInfo::Map(Box::new(value_type))
    }

    /// Create an object type
    pub fn object(class: impl Into<String>) -> Self {
        TypeInfo::Object(class.into())
    }

    /// Get the element type if this is a container
    pub fn element_type(&self) -> Option<&TypeInfo> {
        match self {
            TypeInfo::List(elem) | TypeInfo::Map(elem) => Some(elem),
            _ => None,
        }
    }

    /// Element type of a container, falling back to `Any` when unknown
    pub fn element_type_or_any(&self) -> TypeInfo {
        self.element_type().cloned().unwrap_or(TypeInfo::Any)
    }

    /// Check if this type is a primitive type
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeInfo::Boolean
                | TypeInfo::Integer
                | TypeInfo::Decimal
                | TypeInfo::String
                | TypeInfo::Date
                | TypeInfo::DateTime
                | TypeInfo::Time
        )
    }

    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeInfo::Integer | TypeInfo::Decimal)
    }

    /// Check if this type is a container (list or map)
    pub fn is_container(&self) -> bool {
        matches!(self, TypeInfo::List(_) | TypeInfo::Map(_))
    }

    /// Erased class name: generic parameters are dropped
    pub fn class_name(&self) -> &str {
        match self {
            TypeInfo::Any => "Any",
            TypeInfo::Boolean => "Boolean",
            TypeInfo::Integer => "Integer",
            TypeInfo::Decimal => "Decimal",
            TypeInfo::String => "String",
            TypeInfo::Date => "Date",
            TypeInfo::DateTime => "DateTime",
            TypeInfo::Time => "Time",
            TypeInfo::List(_) => "List",
            TypeInfo::Map(_) => "Map",
            TypeInfo::Object(name) => name,
        }
    }

    /// Get the name of this type for display
    pub fn type_name(&self) -> String {
        match self {
            TypeInfo::List(elem) => format!("List<{}>", elem.type_name()),
            TypeInfo::Map(elem) => format!("Map<String, {}>", elem.type_name()),
            other => other.class_name().to_string(),
        }
    }

    /// Resolve a primitive or container type from its class name
    ///
    /// Unknown names are treated as object classes.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Any" => TypeInfo::Any,
            "Boolean" => TypeInfo::Boolean,
            "Integer" => TypeInfo::Integer,
            "Decimal" => TypeInfo::Decimal,
            "String" => TypeInfo::String,
            "Date" => TypeInfo::Date,
            "DateTime" => TypeInfo::DateTime,
            "Time" => TypeInfo::Time,
            "List" => TypeInfo::list(TypeInfo::Any),
            "Map" => TypeInfo::map(TypeInfo::Any),
            other => TypeInfo::Object(other.to_string()),
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
