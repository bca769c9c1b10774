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

//! Object-graph path navigation
//!
//! Reads and writes values reachable from a root object through path strings
//! such as `address.city` or `orders[2].items["sku"]`. Member access is
//! delegated to an [`AccessorResolver`]; null intermediates are handled by a
//! [`NavigationMode`]; named [`PathFunction`]s can replace member access for
//! individual segments.
//!
//! ```
//! use std::sync::Arc;
//! use octofhir_objpath::{
//!     ClassDefinition, NavigationContext, NavigationMode, Object, ObjectModel, PathNavigator,
//!     TypeInfo, Value,
//! };
//!
//! let model = Arc::new(
//!     ObjectModel::builder()
//!         .class(ClassDefinition::new("Person").property("address", TypeInfo::object("Address")))
//!         .class(ClassDefinition::new("Address").property("city", TypeInfo::String))
//!         .build(),
//! );
//! let navigator = PathNavigator::new(model.clone());
//! let context = NavigationContext::for_model(model);
//!
//! let person = Value::object(Object::new("Person"));
//! navigator
//!     .write_path(&person, "address.city", NavigationMode::ReturnNull, &context, "Berlin".into())
//!     .unwrap();
//! assert_eq!(
//!     navigator.read_path(&person, "address.city", NavigationMode::FailOnNull, &context).unwrap(),
//!     Value::from("Berlin")
//! );
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod path;
pub mod registry;

pub use cache::{CacheConfig, CacheStats, ResolutionCache};
pub use config::NavigatorConfig;
pub use error::{NavigationError, NavigationResult};
pub use evaluator::{NavigationContext, NavigationMode, PathNavigator};
pub use model::{
    AccessError, AccessorResolver, ClassDefinition, ElementAccessor, ObjectFactory, ObjectModel,
    ReadAccessor, Selector, StandardConverter, TypeInfo, ValueConverter, WriteAccessor,
    value::{ListRef, MapRef, Object, ObjectRef, Value},
};
pub use parser::{ParseError, parse};
pub use path::{PathExpression, PathNode, Segment};
pub use registry::{FunctionError, FunctionRegistry, PathFunction};
