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

//! Object graph data model and the collaborator contracts used by the navigator
//!
//! The navigator consumes three services at its boundary: accessor resolution
//! ([`AccessorResolver`]), value conversion ([`ValueConverter`]) and object
//! construction ([`ObjectFactory`]). [`ObjectModel`] and [`StandardConverter`]
//! are reference implementations backed by an explicit class schema.

#![warn(missing_docs)]

pub mod accessor;
pub mod coercion;
pub mod factory;
pub mod schema;
pub mod types;
pub mod value;

pub use accessor::{
    AccessError, AccessResult, AccessorResolver, CollectionElements, ElementAccessor,
    ReadAccessor, Selector, WriteAccessor,
};
pub use coercion::{ConversionError, ConversionResult, StandardConverter, ValueConverter};
pub use factory::{ContainerFactory, CreationError, ObjectFactory};
pub use schema::{ClassDefinition, ObjectModel, ObjectModelBuilder, PropertyDefinition};
pub use types::TypeInfo;
pub use value::{ListRef, MAX_LIST_PADDING, MapRef, Object, ObjectRef, Value};
