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

//! Shared fixtures for navigation tests

#![allow(dead_code)]

use octofhir_objpath::*;
use std::sync::Arc;

/// Model of a small shop:
///
/// ```text
/// Entity (abstract) { id }
/// Customer : Entity { name, total, address, contact, orders, attributes, tags, nickname, secret }
/// Party (abstract) { label }
/// Address { street, city, zip }
/// Order { number, items, lines, status (read-only) }
/// Item { sku, quantity }
/// ```
pub fn shop_model() -> ObjectModel {
    ObjectModel::builder()
        .class(
            ClassDefinition::new("Entity")
                .abstract_class()
                .property("id", TypeInfo::String),
        )
        .class(
            ClassDefinition::new("Customer")
                .extends("Entity")
                .property("name", TypeInfo::String)
                .property("total", TypeInfo::Any)
                .property("address", TypeInfo::object("Address"))
                .property("contact", TypeInfo::object("Party"))
                .property("orders", TypeInfo::list(TypeInfo::object("Order")))
                .property("attributes", TypeInfo::map(TypeInfo::String))
                .property("tags", TypeInfo::list(TypeInfo::Any))
                .property("nickname", TypeInfo::String)
                .write_only("secret", TypeInfo::String),
        )
        .class(
            ClassDefinition::new("Party")
                .abstract_class()
                .property("label", TypeInfo::String),
        )
        .class(
            ClassDefinition::new("Address")
                .property("street", TypeInfo::String)
                .property("city", TypeInfo::String)
                .property("zip", TypeInfo::Integer),
        )
        .class(
            ClassDefinition::new("Order")
                .property("number", TypeInfo::Integer)
                .property("items", TypeInfo::list(TypeInfo::object("Item")))
                .property("lines", TypeInfo::map(TypeInfo::object("Item")))
                .read_only("status", TypeInfo::String),
        )
        .class(
            ClassDefinition::new("Item")
                .property("sku", TypeInfo::String)
                .property("quantity", TypeInfo::Integer),
        )
        .build()
}

/// Navigator, context and model wired together
pub struct Fixture {
    pub model: Arc<ObjectModel>,
    pub navigator: PathNavigator,
    pub context: NavigationContext,
}

impl Fixture {
    /// Fixture without caches
    pub fn new() -> Self {
        Self::with_functions(FunctionRegistry::new())
    }

    /// Fixture with the built-in functions
    pub fn with_builtins() -> Self {
        Self::with_functions(FunctionRegistry::with_builtins())
    }

    /// Fixture with a custom function registry
    pub fn with_functions(functions: FunctionRegistry) -> Self {
        let model = Arc::new(shop_model());
        Self {
            navigator: PathNavigator::with_functions(model.clone(), Arc::new(functions)),
            context: NavigationContext::for_model(model.clone()),
            model,
        }
    }

    /// Same fixture with a resolution cache attached
    pub fn cached(mut self, config: CacheConfig) -> Self {
        self.context = self
            .context
            .with_cache(Arc::new(ResolutionCache::with_config(config)));
        self
    }

    pub fn read(&self, root: &Value, path: &str, mode: NavigationMode) -> NavigationResult<Value> {
        self.navigator.read_path(root, path, mode, &self.context)
    }

    pub fn write(
        &self,
        root: &Value,
        path: &str,
        mode: NavigationMode,
        value: impl Into<Value>,
    ) -> NavigationResult<Value> {
        self.navigator
            .write_path(root, path, mode, &self.context, value.into())
    }
}

pub fn object(class: &str) -> Object {
    Object::new(class)
}

pub fn address(city: &str) -> Value {
    Value::object(object("Address").with("city", city).with("street", "Main St"))
}

pub fn item(sku: &str, quantity: i64) -> Value {
    Value::object(object("Item").with("sku", sku).with("quantity", quantity))
}

pub fn order(number: i64, items: Vec<Value>) -> Value {
    Value::object(
        object("Order")
            .with("number", number)
            .with("items", Value::list(items))
            .with("status", "open"),
    )
}

/// Customer with an address in Berlin, two orders and two attributes
pub fn customer() -> Value {
    Value::object(
        object("Customer")
            .with("id", "c-1")
            .with("name", "Ada")
            .with("total", "42")
            .with("address", address("Berlin"))
            .with(
                "orders",
                Value::list(vec![
                    order(1, vec![item("apple", 3), item("pear", 1)]),
                    order(2, vec![item("plum", 7)]),
                ]),
            )
            .with(
                "attributes",
                Value::map([("color", Value::from("red")), ("size", Value::from("L"))]),
            )
            .with("tags", Value::list(vec!["a".into(), "b".into(), "c".into()])),
    )
}

/// Customer whose address is null
pub fn customer_without_address() -> Value {
    Value::object(
        object("Customer")
            .with("name", "Bob")
            .with("address", Value::Null),
    )
}
