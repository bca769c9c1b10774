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

//! Dynamic values of a navigable object graph
//!
//! Scalars are stored inline. Lists, maps and objects are *handles*: cloning a
//! [`Value::List`], [`Value::Map`] or [`Value::Object`] shares the underlying
//! node, so a value returned from navigation aliases the graph it came from.
//! Each node carries its own `RwLock`; locks are held only for the duration of
//! a single element or field access.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use indexmap::IndexMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use super::accessor::{AccessError, AccessResult};
use super::types::TypeInfo;

/// Most `Null` slots a single write may append before the written element
pub const MAX_LIST_PADDING: usize = 4096;

/// Core value type of an object graph
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with arbitrary precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Date value (without time)
    Date(NaiveDate),

    /// DateTime value with timezone
    DateTime(DateTime<FixedOffset>),

    /// Time value (without date)
    Time(NaiveTime),

    /// Shared ordered container
    List(ListRef),

    /// Shared string-keyed container
    Map(MapRef),

    /// Shared object instance
    Object(ObjectRef),
}

impl Value {
    /// Create a list value from items
    pub fn list(items: Vec<Value>) -> Self {
        Self::List(ListRef::new(items))
    }

    /// Create a map value from entries
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(MapRef::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Wrap an object into a shared value
    pub fn object(object: Object) -> Self {
        Self::Object(ObjectRef::new(object))
    }

    /// Check if the value is absent
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Runtime type of this value
    ///
    /// Runtime containers carry no element type and report `Any` for it.
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Self::Null => TypeInfo::Any,
            Self::Boolean(_) => TypeInfo::Boolean,
            Self::Integer(_) => TypeInfo::Integer,
            Self::Decimal(_) => TypeInfo::Decimal,
            Self::String(_) => TypeInfo::String,
            Self::Date(_) => TypeInfo::Date,
            Self::DateTime(_) => TypeInfo::DateTime,
            Self::Time(_) => TypeInfo::Time,
            Self::List(_) => TypeInfo::list(TypeInfo::Any),
            Self::Map(_) => TypeInfo::map(TypeInfo::Any),
            Self::Object(obj) => TypeInfo::Object(obj.class().to_string()),
        }
    }

    /// Name of the runtime type, used in diagnostics
    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Object(obj) => obj.class().to_string(),
            other => other.type_info().class_name().to_string(),
        }
    }

    /// Get as integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as decimal if possible
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Self::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Get as string if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as boolean if possible
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the list handle if this is a list
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get the map handle if this is a map
    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the object handle if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Convert to a JSON value, snapshotting shared nodes
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::Integer(i) => JsonValue::Number((*i).into()),
            Self::Decimal(d) => d
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(d.to_string())),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            Self::Time(t) => JsonValue::String(t.format("%H:%M:%S").to_string()),
            Self::List(list) => JsonValue::Array(list.to_vec().iter().map(Value::to_json).collect()),
            Self::Map(map) => JsonValue::Object(
                map.entries()
                    .into_iter()
                    .map(|(k, v)| (k, v.to_json()))
                    .collect(),
            ),
            Self::Object(obj) => JsonValue::Object(
                obj.snapshot()
                    .fields
                    .into_iter()
                    .map(|(k, v)| (k, v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(d) = n.as_f64().and_then(|f| Decimal::try_from(f).ok()) {
                    Self::Decimal(d)
                } else {
                    Self::String(n.to_string())
                }
            }
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(arr) => Self::list(arr.into_iter().map(Value::from).collect()),
            JsonValue::Object(obj) => Self::map(obj.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::list(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::object(object)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Integer(i) => write!(f, "Integer({i})"),
            Self::Decimal(d) => write!(f, "Decimal({d})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Date(d) => write!(f, "Date({})", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "DateTime({})", dt.to_rfc3339()),
            Self::Time(t) => write!(f, "Time({})", t.format("%H:%M:%S")),
            Self::List(list) => write!(f, "List({:?})", list.to_vec()),
            Self::Map(map) => write!(f, "Map({:?})", map.entries()),
            Self::Object(obj) => {
                let snapshot = obj.snapshot();
                write!(f, "{}({:?})", snapshot.class, snapshot.fields)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

/// Shared handle to an ordered container
#[derive(Clone, Default)]
pub struct ListRef(Arc<RwLock<Vec<Value>>>);

impl ListRef {
    /// Create a new list handle
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Get an element by index
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Replace the element at `index`, returning the previous one
    ///
    /// Writing past the end grows the list, padding with `Null`. Growth is
    /// bounded by [`MAX_LIST_PADDING`]; a write further out fails and leaves
    /// the list untouched.
    pub fn set(&self, index: usize, value: Value) -> AccessResult<Value> {
        let mut items = self.0.write();
        if index >= items.len() {
            let padding = index - items.len();
            if padding > MAX_LIST_PADDING {
                return Err(AccessError::Failed {
                    message: format!(
                        "index {index} is {padding} past the end of a list of {}",
                        items.len()
                    ),
                });
            }
            let new_len = index.checked_add(1).ok_or_else(|| AccessError::Failed {
                message: format!("index {index} overflows the list length"),
            })?;
            let additional = new_len - items.len();
            items
                .try_reserve(additional)
                .map_err(|err| AccessError::Failed {
                    message: format!("cannot grow list to {new_len} elements: {err}"),
                })?;
            items.resize(new_len, Value::Null);
        }
        Ok(std::mem::replace(&mut items[index], value))
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Snapshot of the elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Check if both handles point at the same list
    pub fn ptr_eq(&self, other: &ListRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ListRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_vec())
    }
}

/// Shared handle to a string-keyed, insertion-ordered container
#[derive(Clone, Default)]
pub struct MapRef(Arc<RwLock<IndexMap<String, Value>>>);

impl MapRef {
    /// Create a new map handle
    pub fn new(entries: IndexMap<String, Value>) -> Self {
        Self(Arc::new(RwLock::new(entries)))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Check if `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Store `value` under `key`, returning the previous value (`Null` if none)
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Value {
        self.0.write().insert(key.into(), value).unwrap_or_default()
    }

    /// Snapshot of the entries in insertion order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Check if both handles point at the same map
    pub fn ptr_eq(&self, other: &MapRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for MapRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for MapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.entries())
    }
}

/// An object instance: a class name plus named fields
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Class of this instance
    pub class: Arc<str>,
    /// Field values in insertion order
    pub fields: IndexMap<String, Value>,
}

impl Object {
    /// Create an empty instance of `class`
    pub fn new(class: impl Into<Arc<str>>) -> Self {
        Self {
            class: class.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Shared handle to an object instance
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    /// Create a new object handle
    pub fn new(object: Object) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Class of the referenced instance
    pub fn class(&self) -> Arc<str> {
        Arc::clone(&self.0.read().class)
    }

    /// Read a field; missing fields are `Null`
    pub fn get(&self, name: &str) -> Value {
        self.0.read().fields.get(name).cloned().unwrap_or_default()
    }

    /// Write a field, returning the previous value (`Null` if unset)
    pub fn set(&self, name: impl Into<String>, value: Value) -> Value {
        self.0
            .write()
            .fields
            .insert(name.into(), value)
            .unwrap_or_default()
    }

    /// Clone of the current object state
    pub fn snapshot(&self) -> Object {
        self.0.read().clone()
    }

    /// Check if both handles point at the same instance
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handles_share_state() {
        let address = Value::object(Object::new("Address"));
        let alias = address.clone();

        if let Value::Object(obj) = &alias {
            obj.set("city", Value::from("Berlin"));
        }

        assert_eq!(
            address.as_object().map(|obj| obj.get("city")),
            Some(Value::from("Berlin"))
        );
    }

    #[test]
    fn test_list_set_grows_with_nulls() {
        let list = ListRef::new(vec![Value::from("a")]);
        let previous = list.set(3, Value::from("d"));

        assert_eq!(previous, Ok(Value::Null));
        assert_eq!(list.len(), 4);
        assert_eq!(list.get(1), Some(Value::Null));
        assert_eq!(list.get(3), Some(Value::from("d")));
    }

    #[test]
    fn test_list_set_rejects_far_indices() {
        let list = ListRef::new(vec![Value::from("a")]);

        assert!(matches!(
            list.set(usize::MAX, Value::from("z")),
            Err(AccessError::Failed { .. })
        ));
        assert!(matches!(
            list.set(MAX_LIST_PADDING + 2, Value::from("z")),
            Err(AccessError::Failed { .. })
        ));
        assert_eq!(list.to_vec(), vec![Value::from("a")]);

        assert_eq!(list.set(MAX_LIST_PADDING + 1, Value::from("z")), Ok(Value::Null));
        assert_eq!(list.len(), MAX_LIST_PADDING + 2);
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::from(json!({"name": "test", "value": 42, "tags": ["a", "b"]}));

        let map = value.as_map().expect("object becomes a map");
        assert_eq!(map.get("value"), Some(Value::Integer(42)));
        assert_eq!(
            map.get("tags").and_then(|tags| tags.as_list().map(ListRef::len)),
            Some(2)
        );
        assert_eq!(
            value.to_json(),
            json!({"name": "test", "value": 42, "tags": ["a", "b"]})
        );
    }

    #[test]
    fn test_type_info() {
        assert_eq!(Value::Null.type_info(), TypeInfo::Any);
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(
            Value::object(Object::new("Person")).type_info(),
            TypeInfo::object("Person")
        );
        assert_eq!(Value::list(vec![]).type_info().class_name(), "List");
    }
}
