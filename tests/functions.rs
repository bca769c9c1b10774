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

//! Path functions: precedence, built-ins and writes through functions

use octofhir_objpath::registry::FunctionResult;
use octofhir_objpath::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

mod utils;
use utils::{Fixture, address, customer, customer_without_address};

/// Replaces the `address` member with a fixed address
struct FixedAddress {
    calls: Arc<AtomicUsize>,
}

impl PathFunction for FixedAddress {
    fn name(&self) -> &str {
        "address"
    }

    fn result_type(&self, _owner: &TypeInfo) -> TypeInfo {
        TypeInfo::object("Address")
    }

    fn read(&self, _: &Value, _: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(address("Oslo"))
    }
}

/// Writes `nickname` into the `alias` field
struct Alias;

impl PathFunction for Alias {
    fn name(&self) -> &str {
        "nickname"
    }

    fn accepted_type(&self, _owner: &TypeInfo) -> Option<TypeInfo> {
        Some(TypeInfo::String)
    }

    fn read(&self, target: &Value, _: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        Ok(target
            .as_object()
            .map(|object| object.get("alias"))
            .unwrap_or_default())
    }

    fn write(
        &self,
        target: &Value,
        _: &[Value],
        value: Value,
        _: &NavigationContext,
    ) -> FunctionResult<Value> {
        Ok(target
            .as_object()
            .map(|object| object.set("alias", value))
            .unwrap_or_default())
    }
}

/// Exposes the customer's tags list under another name
struct AllTags;

impl PathFunction for AllTags {
    fn name(&self) -> &str {
        "all_tags"
    }

    fn result_type(&self, _owner: &TypeInfo) -> TypeInfo {
        TypeInfo::list(TypeInfo::String)
    }

    fn read(&self, target: &Value, _: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        Ok(target
            .as_object()
            .map(|object| object.get("tags"))
            .unwrap_or_default())
    }
}

/// Joins its arguments with the owner's name
struct Greet;

impl PathFunction for Greet {
    fn name(&self) -> &str {
        "greet"
    }

    fn read(&self, target: &Value, args: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        self.validate_arity(args, 1, Some(2))?;
        let name = target
            .as_object()
            .map(|object| object.get("name").to_string())
            .unwrap_or_default();
        let parts: Vec<String> = args.iter().map(Value::to_string).collect();
        Ok(Value::String(format!("{} {name}", parts.join(" "))))
    }
}

fn custom_fixture(calls: Arc<AtomicUsize>) -> Fixture {
    let mut functions = FunctionRegistry::with_builtins();
    functions.register_function(FixedAddress { calls }).unwrap();
    functions.register_function(Alias).unwrap();
    functions.register_function(AllTags).unwrap();
    functions.register_function(Greet).unwrap();
    Fixture::with_functions(functions)
}

#[test]
fn registered_function_takes_precedence_over_member() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fx = custom_fixture(calls.clone());

    for mode in [NavigationMode::ReturnNull, NavigationMode::FailOnNull] {
        assert_eq!(
            fx.read(&customer(), "address.city", mode).unwrap(),
            Value::from("Oslo")
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn function_write_receives_converted_value() {
    let fx = custom_fixture(Arc::new(AtomicUsize::new(0)));
    let root = customer();

    assert_eq!(
        fx.write(&root, "nickname", NavigationMode::FailOnNull, 7)
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        root.as_object().unwrap().get("alias"),
        Value::from("7")
    );
    assert_eq!(root.as_object().unwrap().get("nickname"), Value::Null);
    assert_eq!(
        fx.read(&root, "nickname", NavigationMode::FailOnNull).unwrap(),
        Value::from("7")
    );
}

#[test]
fn function_backs_indexed_segments() {
    let fx = custom_fixture(Arc::new(AtomicUsize::new(0)));
    let root = customer();

    assert_eq!(
        fx.read(&root, "all_tags[2]", NavigationMode::FailOnNull).unwrap(),
        Value::from("c")
    );
    assert_eq!(
        fx.write(&root, "all_tags[0]", NavigationMode::FailOnNull, "first")
            .unwrap(),
        Value::from("a")
    );
    assert_eq!(
        fx.read(&root, "tags[0]", NavigationMode::FailOnNull).unwrap(),
        Value::from("first")
    );
}

#[test]
fn function_arguments_are_passed_through() {
    let fx = custom_fixture(Arc::new(AtomicUsize::new(0)));
    assert_eq!(
        fx.read(&customer(), "greet('Hello', 2)", NavigationMode::FailOnNull)
            .unwrap(),
        Value::from("Hello 2 Ada")
    );
    assert!(matches!(
        fx.read(&customer(), "greet()", NavigationMode::FailOnNull),
        Err(NavigationError::Function(FunctionError::InvalidArity { .. }))
    ));
}

#[rstest]
#[case("orders.first().number", Value::Integer(1))]
#[case("orders.last().items.first().sku", Value::from("plum"))]
#[case("orders.at(1).number", Value::Integer(2))]
#[case("orders.at(9)", Value::Null)]
#[case("tags.size()", Value::Integer(3))]
#[case("attributes.size()", Value::Integer(2))]
#[case("name.size()", Value::Integer(3))]
fn builtin_functions(#[case] path: &str, #[case] expected: Value) {
    let fx = Fixture::with_builtins();
    assert_eq!(
        fx.read(&customer(), path, NavigationMode::FailOnNull).unwrap(),
        expected
    );
}

#[rstest]
#[case("orders.first().items", Some(TypeInfo::list(TypeInfo::object("Item"))))]
#[case("orders.at(0).number", Some(TypeInfo::Integer))]
#[case("tags.size()", Some(TypeInfo::Integer))]
fn builtin_result_types(#[case] path: &str, #[case] expected: Option<TypeInfo>) {
    let fx = Fixture::with_builtins();
    assert_eq!(
        fx.navigator
            .resolve_path_type(
                &customer_without_address(),
                path,
                NavigationMode::FailOnNull,
                &fx.context
            )
            .unwrap(),
        expected
    );
}

#[test]
fn write_through_builtin() {
    let fx = Fixture::with_builtins();
    let root = customer();

    assert_eq!(
        fx.write(&root, "tags.first()", NavigationMode::FailOnNull, "q")
            .unwrap(),
        Value::from("a")
    );
    assert_eq!(
        fx.write(&root, "orders.last().number", NavigationMode::FailOnNull, "20")
            .unwrap(),
        Value::Integer(2)
    );
    assert_eq!(
        fx.read(&root, "orders[1].number", NavigationMode::FailOnNull)
            .unwrap(),
        Value::Integer(20)
    );
}

#[test]
fn write_creates_intermediates_through_builtin() {
    let fx = Fixture::with_builtins();
    let root = customer_without_address();

    fx.write(&root, "orders.first().number", NavigationMode::FailOnNull, 5)
        .unwrap();

    assert_eq!(
        fx.read(&root, "orders[0].number", NavigationMode::FailOnNull)
            .unwrap(),
        Value::Integer(5)
    );
}

#[test]
fn read_only_function_rejects_writes() {
    let fx = Fixture::with_builtins();
    for mode in [
        NavigationMode::ReturnNull,
        NavigationMode::FailOnNull,
        NavigationMode::CreateOnNull,
    ] {
        assert_eq!(
            fx.write(&customer(), "tags.size()", mode, 1).unwrap_err(),
            NavigationError::Function(FunctionError::ReadOnly {
                name: "size".to_string()
            })
        );
    }
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut functions = FunctionRegistry::with_builtins();
    assert_eq!(
        functions.register("first", Alias),
        Err(FunctionError::Duplicate {
            name: "first".to_string()
        })
    );
}
