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

//! Read navigation: plain, typed and declared-type resolution

use octofhir_objpath::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

mod utils;
use utils::{Fixture, customer, customer_without_address};

#[test]
fn reads_nested_property() {
    let fx = Fixture::new();
    assert_eq!(
        fx.read(&customer(), "address.city", NavigationMode::FailOnNull)
            .unwrap(),
        Value::from("Berlin")
    );
}

#[rstest]
#[case("name", Value::from("Ada"))]
#[case("tags[1]", Value::from("b"))]
#[case("orders[1].items[0].sku", Value::from("plum"))]
#[case("orders[0].items[1].quantity", Value::Integer(1))]
#[case(r#"attributes["color"]"#, Value::from("red"))]
#[case("attributes['size']", Value::from("L"))]
#[case("attributes.color", Value::from("red"))]
#[case(r#"attributes["missing"]"#, Value::Null)]
#[case("tags[10]", Value::Null)]
#[case("nickname", Value::Null)]
fn reads_segments(#[case] path: &str, #[case] expected: Value) {
    let fx = Fixture::new();
    for mode in [
        NavigationMode::ReturnNull,
        NavigationMode::FailOnNull,
        NavigationMode::CreateOnNull,
    ] {
        assert_eq!(fx.read(&customer(), path, mode).unwrap(), expected);
    }
}

#[test]
fn returns_the_shared_instance() {
    let fx = Fixture::new();
    let root = customer();

    let address = fx.read(&root, "address", NavigationMode::FailOnNull).unwrap();
    address.as_object().unwrap().set("city", Value::from("Paris"));

    assert_eq!(
        fx.read(&root, "address.city", NavigationMode::FailOnNull)
            .unwrap(),
        Value::from("Paris")
    );
}

#[test]
fn return_null_stops_at_null_intermediate() {
    let fx = Fixture::new();
    let root = customer_without_address();
    let before = root.to_json();

    let value = fx
        .read(&root, "address.city", NavigationMode::ReturnNull)
        .unwrap();

    assert_eq!(value, Value::Null);
    assert_eq!(root.to_json(), before);
}

#[test]
fn fail_on_null_names_the_segment() {
    let fx = Fixture::new();
    let root = customer_without_address();
    let before = root.to_json();

    let err = fx
        .read(&root, "address.city", NavigationMode::FailOnNull)
        .unwrap_err();

    assert_eq!(
        err,
        NavigationError::SegmentNull {
            segment: "address".to_string(),
            path: "address".to_string(),
            owner_type: "Customer".to_string(),
        }
    );
    assert_eq!(root.to_json(), before);
}

#[test]
fn create_on_null_installs_missing_intermediate() {
    let fx = Fixture::new();
    let root = customer_without_address();

    let value = fx
        .read(&root, "address.city", NavigationMode::CreateOnNull)
        .unwrap();

    assert_eq!(value, Value::Null);
    let address = fx.read(&root, "address", NavigationMode::FailOnNull).unwrap();
    assert_eq!(address.type_name(), "Address");
    assert_eq!(address.to_json(), json!({}));
}

#[test]
fn out_of_range_intermediate_follows_mode() {
    let fx = Fixture::new();
    let root = customer();

    assert_eq!(
        fx.read(&root, "orders[5].number", NavigationMode::ReturnNull)
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        fx.read(&root, "orders[5].number", NavigationMode::FailOnNull)
            .unwrap_err(),
        NavigationError::SegmentNull {
            segment: "orders[5]".to_string(),
            path: "orders[5]".to_string(),
            owner_type: "List<Order>".to_string(),
        }
    );
}

#[test]
fn null_container_is_an_intermediate() {
    let fx = Fixture::new();
    let root = customer_without_address();

    assert_eq!(
        fx.read(&root, "tags[0]", NavigationMode::ReturnNull).unwrap(),
        Value::Null
    );
    assert!(matches!(
        fx.read(&root, "tags[0]", NavigationMode::FailOnNull),
        Err(NavigationError::SegmentNull { .. })
    ));

    assert_eq!(
        fx.read(&root, "tags[0]", NavigationMode::CreateOnNull).unwrap(),
        Value::Null
    );
    let tags = fx.read(&root, "tags", NavigationMode::FailOnNull).unwrap();
    assert_eq!(tags, Value::list(vec![]));
}

#[rstest]
#[case("address.country")]
#[case("secret")]
#[case("orders.first()")]
#[case("name[0]")]
#[case("address.city.length")]
fn unresolvable_members_fail_in_every_mode(#[case] path: &str) {
    let fx = Fixture::new();
    for mode in [
        NavigationMode::ReturnNull,
        NavigationMode::FailOnNull,
        NavigationMode::CreateOnNull,
    ] {
        assert!(
            matches!(
                fx.read(&customer(), path, mode),
                Err(NavigationError::Access { .. })
            ),
            "{path} in {mode}"
        );
    }
}

#[test]
fn malformed_paths_fail_before_navigation() {
    let fx = Fixture::new();
    let err = fx
        .read(&customer(), "address..city", NavigationMode::ReturnNull)
        .unwrap_err();
    assert_eq!(
        err,
        NavigationError::MalformedPath {
            path: "address..city".to_string(),
            source: ParseError::EmptySegment { position: 8 },
        }
    );
}

#[test]
fn null_root() {
    let fx = Fixture::new();
    assert_eq!(
        fx.read(&Value::Null, "address.city", NavigationMode::ReturnNull)
            .unwrap(),
        Value::Null
    );
    assert!(matches!(
        fx.read(&Value::Null, "address.city", NavigationMode::CreateOnNull),
        Err(NavigationError::SegmentNull { .. })
    ));
}

#[test]
fn typed_read_converts_result() {
    let fx = Fixture::new();
    let root = customer();

    assert_eq!(
        fx.navigator
            .read_path_as(
                &root,
                "total",
                NavigationMode::FailOnNull,
                &fx.context,
                &TypeInfo::Integer
            )
            .unwrap(),
        Value::Integer(42)
    );

    let err = fx
        .navigator
        .read_path_as(
            &root,
            "total",
            NavigationMode::FailOnNull,
            &fx.context,
            &TypeInfo::Date,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        NavigationError::Conversion { ref target_type, .. } if target_type == "Date"
    ));
}

#[test]
fn typed_read_of_absent_value() {
    let fx = Fixture::new();
    assert_eq!(
        fx.navigator
            .read_path_as(
                &customer_without_address(),
                "address.zip",
                NavigationMode::ReturnNull,
                &fx.context,
                &TypeInfo::Integer
            )
            .unwrap(),
        Value::Null
    );
}

#[test]
fn reads_plain_json_graphs() {
    let fx = Fixture::new();
    let root = Value::from(json!({
        "customer": {
            "address": { "city": "Lisbon" },
            "orders": [ { "total": 10 }, { "total": 12.5 } ]
        }
    }));

    assert_eq!(
        fx.read(&root, "customer.address.city", NavigationMode::FailOnNull)
            .unwrap(),
        Value::from("Lisbon")
    );
    assert_eq!(
        fx.read(&root, "customer.orders[0].total", NavigationMode::FailOnNull)
            .unwrap(),
        Value::Integer(10)
    );
    assert_eq!(
        fx.read(&root, "customer.phone.number", NavigationMode::ReturnNull)
            .unwrap(),
        Value::Null
    );
}

#[rstest]
#[case("address.city", Some(TypeInfo::String))]
#[case("orders[0].items", Some(TypeInfo::list(TypeInfo::object("Item"))))]
#[case("orders[0].lines['x'].quantity", Some(TypeInfo::Integer))]
#[case(r#"attributes["any"]"#, Some(TypeInfo::String))]
#[case("address.country", None)]
fn resolves_declared_types(#[case] path: &str, #[case] expected: Option<TypeInfo>) {
    let fx = Fixture::new();
    let root = customer_without_address();
    let before = root.to_json();

    let resolved = fx
        .navigator
        .resolve_path_type(&root, path, NavigationMode::ReturnNull, &fx.context)
        .unwrap();

    assert_eq!(resolved, expected);
    assert_eq!(root.to_json(), before);
}

#[test]
fn resolve_type_raises_missing_accessor_outside_return_null() {
    let fx = Fixture::new();
    for mode in [NavigationMode::FailOnNull, NavigationMode::CreateOnNull] {
        assert!(matches!(
            fx.navigator
                .resolve_path_type(&customer(), "address.country", mode, &fx.context),
            Err(NavigationError::Access { .. })
        ));
    }
}
