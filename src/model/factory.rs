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

//! Object construction contract used for on-demand creation of intermediates

use thiserror::Error;

use super::types::TypeInfo;
use super::value::Value;

/// Errors that can occur while instantiating a type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreationError {
    /// The type is not known to the factory
    #[error("unknown type {type_name}")]
    UnknownType {
        /// Type name
        type_name: String,
    },

    /// The type is abstract
    #[error("{type_name} is abstract")]
    Abstract {
        /// Type name
        type_name: String,
    },

    /// The type has no empty form (primitives, `Any`)
    #[error("{type_name} has no default instance")]
    NoDefaultForm {
        /// Type name
        type_name: String,
    },
}

/// Produces new, empty instances of a type
pub trait ObjectFactory: Send + Sync {
    /// Create an empty instance of `ty`
    fn create(&self, ty: &TypeInfo) -> Result<Value, CreationError>;
}

/// Factory that only knows the built-in containers
///
/// Lists and maps are created empty; every other type fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerFactory;

impl ObjectFactory for ContainerFactory {
    fn create(&self, ty: &TypeInfo) -> Result<Value, CreationError> {
        match ty {
            TypeInfo::List(_) => Ok(Value::list(Vec::new())),
            TypeInfo::Map(_) => Ok(Value::map(Vec::<(String, Value)>::new())),
            TypeInfo::Object(name) => Err(CreationError::UnknownType {
                type_name: name.clone(),
            }),
            other => Err(CreationError::NoDefaultForm {
                type_name: other.type_name(),
            }),
        }
    }
}
