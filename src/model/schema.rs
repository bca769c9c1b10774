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

//! Schema-backed accessor resolution and object construction
//!
//! [`ObjectModel`] is a registry of class definitions. It resolves property
//! accessors for [`Value::Object`] instances, treats property names on
//! [`Value::Map`] owners as entry keys, and creates empty instances of the
//! classes it knows about.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::accessor::{
    AccessError, AccessResult, AccessorResolver, CollectionElements, ElementAccessor,
    ReadAccessor, WriteAccessor,
};
use super::factory::{CreationError, ObjectFactory};
use super::types::TypeInfo;
use super::value::{Object, ObjectRef, Value};

/// Definition of a property
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    /// Property name
    pub name: String,
    /// Declared type
    pub type_info: TypeInfo,
    /// Whether a read accessor is exposed
    pub readable: bool,
    /// Whether a write accessor is exposed
    pub writable: bool,
}

/// Definition of a class in the model
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// Class name
    pub name: String,
    /// Base class (for inheritance)
    pub base_class: Option<String>,
    /// Abstract classes cannot be instantiated
    pub is_abstract: bool,
    /// Properties declared directly on this class
    pub properties: IndexMap<String, PropertyDefinition>,
}

impl ClassDefinition {
    /// Start a new class definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_class: None,
            is_abstract: false,
            properties: IndexMap::new(),
        }
    }

    /// Inherit properties from `base`
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base_class = Some(base.into());
        self
    }

    /// Mark the class abstract
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a readable and writable property
    pub fn property(self, name: impl Into<String>, type_info: TypeInfo) -> Self {
        self.with_property(name, type_info, true, true)
    }

    /// Add a property without a write accessor
    pub fn read_only(self, name: impl Into<String>, type_info: TypeInfo) -> Self {
        self.with_property(name, type_info, true, false)
    }

    /// Add a property without a read accessor
    pub fn write_only(self, name: impl Into<String>, type_info: TypeInfo) -> Self {
        self.with_property(name, type_info, false, true)
    }

    fn with_property(
        mut self,
        name: impl Into<String>,
        type_info: TypeInfo,
        readable: bool,
        writable: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            PropertyDefinition {
                name,
                type_info,
                readable,
                writable,
            },
        );
        self
    }
}

/// Field accessor bound to one property of one class
#[derive(Debug)]
pub struct FieldAccessor {
    class: String,
    property: String,
    declared: TypeInfo,
}

impl FieldAccessor {
    fn owner<'a>(&self, owner: &'a Value) -> AccessResult<&'a ObjectRef> {
        owner.as_object().ok_or_else(|| AccessError::OwnerMismatch {
            expected: self.class.clone(),
            actual: owner.type_name(),
        })
    }
}

impl ReadAccessor for FieldAccessor {
    fn declared_type(&self) -> &TypeInfo {
        &self.declared
    }

    fn read(&self, owner: &Value) -> AccessResult<Value> {
        Ok(self.owner(owner)?.get(&self.property))
    }
}

impl WriteAccessor for FieldAccessor {
    fn declared_type(&self) -> &TypeInfo {
        &self.declared
    }

    fn write(&self, owner: &Value, value: Value) -> AccessResult<Value> {
        Ok(self.owner(owner)?.set(self.property.clone(), value))
    }
}

/// Accessor for a named entry of a map owner
#[derive(Debug)]
pub struct EntryAccessor {
    key: String,
    declared: TypeInfo,
}

impl EntryAccessor {
    /// Accessor for `key` with the map's value type
    pub fn new(key: impl Into<String>, declared: TypeInfo) -> Self {
        Self {
            key: key.into(),
            declared,
        }
    }
}

impl ReadAccessor for EntryAccessor {
    fn declared_type(&self) -> &TypeInfo {
        &self.declared
    }

    fn read(&self, owner: &Value) -> AccessResult<Value> {
        match owner {
            Value::Map(map) => Ok(map.get(&self.key).unwrap_or_default()),
            other => Err(AccessError::OwnerMismatch {
                expected: "Map".to_string(),
                actual: other.type_name(),
            }),
        }
    }
}

impl WriteAccessor for EntryAccessor {
    fn declared_type(&self) -> &TypeInfo {
        &self.declared
    }

    fn write(&self, owner: &Value, value: Value) -> AccessResult<Value> {
        match owner {
            Value::Map(map) => Ok(map.insert(self.key.clone(), value)),
            other => Err(AccessError::OwnerMismatch {
                expected: "Map".to_string(),
                actual: other.type_name(),
            }),
        }
    }
}

#[derive(Debug)]
struct ResolvedClass {
    definition: ClassDefinition,
    readers: FxHashMap<String, Arc<FieldAccessor>>,
    writers: FxHashMap<String, Arc<FieldAccessor>>,
}

/// Registry of class definitions acting as accessor resolver and object factory
#[derive(Debug, Default)]
pub struct ObjectModel {
    classes: FxHashMap<String, ResolvedClass>,
}

impl ObjectModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a model
    pub fn builder() -> ObjectModelBuilder {
        ObjectModelBuilder::default()
    }

    /// Get a class definition
    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.get(name).map(|class| &class.definition)
    }

    /// Check if a class exists
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Check if `child` is `parent` or inherits from it
    pub fn is_subclass_of(&self, child: &str, parent: &str) -> bool {
        let mut current = Some(child);
        // bounded by the number of classes so a cyclic hierarchy terminates
        for _ in 0..=self.classes.len() {
            match current {
                Some(name) if name == parent => return true,
                Some(name) => {
                    current = self
                        .classes
                        .get(name)
                        .and_then(|class| class.definition.base_class.as_deref());
                }
                None => return false,
            }
        }
        false
    }

    /// Walk `class` and its ancestors, returning the first match of `select`
    fn lookup<T>(
        &self,
        class: &str,
        select: impl Fn(&ResolvedClass) -> Option<T>,
    ) -> Option<T> {
        let mut current = Some(class);
        for _ in 0..=self.classes.len() {
            let resolved = self.classes.get(current?)?;
            if let Some(found) = select(resolved) {
                return Some(found);
            }
            current = resolved.definition.base_class.as_deref();
        }
        None
    }

    /// Declared type of a property, searching base classes
    pub fn property_type(&self, class: &str, property: &str) -> Option<&TypeInfo> {
        let mut current = Some(class);
        for _ in 0..=self.classes.len() {
            let resolved = self.classes.get(current?)?;
            if let Some(definition) = resolved.definition.properties.get(property) {
                return Some(&definition.type_info);
            }
            current = resolved.definition.base_class.as_deref();
        }
        None
    }
}

impl AccessorResolver for ObjectModel {
    fn resolve_read(&self, owner: &TypeInfo, member: &str) -> Option<Arc<dyn ReadAccessor>> {
        match owner {
            TypeInfo::Object(class) => self
                .lookup(class, |resolved| resolved.readers.get(member).cloned())
                .map(|accessor| accessor as Arc<dyn ReadAccessor>),
            TypeInfo::Map(value_type) => Some(Arc::new(EntryAccessor::new(
                member,
                value_type.as_ref().clone(),
            ))),
            _ => None,
        }
    }

    fn resolve_write(&self, owner: &TypeInfo, member: &str) -> Option<Arc<dyn WriteAccessor>> {
        match owner {
            TypeInfo::Object(class) => self
                .lookup(class, |resolved| resolved.writers.get(member).cloned())
                .map(|accessor| accessor as Arc<dyn WriteAccessor>),
            TypeInfo::Map(value_type) => Some(Arc::new(EntryAccessor::new(
                member,
                value_type.as_ref().clone(),
            ))),
            _ => None,
        }
    }

    fn resolve_element(&self, container: &TypeInfo) -> Option<Arc<dyn ElementAccessor>> {
        container
            .is_container()
            .then(|| Arc::new(CollectionElements) as Arc<dyn ElementAccessor>)
    }
}

impl ObjectFactory for ObjectModel {
    fn create(&self, ty: &TypeInfo) -> Result<Value, CreationError> {
        match ty {
            TypeInfo::Object(name) => {
                let class = self.class(name).ok_or_else(|| CreationError::UnknownType {
                    type_name: name.clone(),
                })?;
                if class.is_abstract {
                    return Err(CreationError::Abstract {
                        type_name: name.clone(),
                    });
                }
                Ok(Value::object(Object::new(name.as_str())))
            }
            TypeInfo::List(_) => Ok(Value::list(Vec::new())),
            TypeInfo::Map(_) => Ok(Value::map(Vec::<(String, Value)>::new())),
            other => Err(CreationError::NoDefaultForm {
                type_name: other.type_name(),
            }),
        }
    }
}

/// Builder for [`ObjectModel`]
#[derive(Debug, Default)]
pub struct ObjectModelBuilder {
    classes: Vec<ClassDefinition>,
}

impl ObjectModelBuilder {
    /// Add a class definition; a later definition replaces an earlier one
    pub fn class(mut self, definition: ClassDefinition) -> Self {
        self.classes.push(definition);
        self
    }

    /// Finish the model, pre-building one accessor per property
    pub fn build(self) -> ObjectModel {
        let mut classes = FxHashMap::default();

        for definition in self.classes {
            let mut readers = FxHashMap::default();
            let mut writers = FxHashMap::default();

            for property in definition.properties.values() {
                let accessor = Arc::new(FieldAccessor {
                    class: definition.name.clone(),
                    property: property.name.clone(),
                    declared: property.type_info.clone(),
                });
                if property.readable {
                    readers.insert(property.name.clone(), Arc::clone(&accessor));
                }
                if property.writable {
                    writers.insert(property.name.clone(), accessor);
                }
            }

            classes.insert(
                definition.name.clone(),
                ResolvedClass {
                    definition,
                    readers,
                    writers,
                },
            );
        }

        ObjectModel { classes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ObjectModel {
        ObjectModel::builder()
            .class(
                ClassDefinition::new("Party")
                    .abstract_class()
                    .read_only("id", TypeInfo::Integer),
            )
            .class(
                ClassDefinition::new("Person")
                    .extends("Party")
                    .property("name", TypeInfo::String)
                    .property("address", TypeInfo::object("Address")),
            )
            .class(ClassDefinition::new("Address").property("city", TypeInfo::String))
            .build()
    }

    #[test]
    fn test_resolves_inherited_properties() {
        let model = model();
        let person = TypeInfo::object("Person");

        let id = model.resolve_read(&person, "id").expect("inherited reader");
        assert_eq!(id.declared_type(), &TypeInfo::Integer);
        assert!(model.resolve_write(&person, "id").is_none());
        assert!(model.resolve_read(&person, "missing").is_none());
        assert_eq!(
            model.property_type("Person", "address"),
            Some(&TypeInfo::object("Address"))
        );
    }

    #[test]
    fn test_field_accessor_round_trip() {
        let model = model();
        let person = Value::object(Object::new("Person"));
        let writer = model
            .resolve_write(&TypeInfo::object("Person"), "name")
            .expect("writer");
        let reader = model
            .resolve_read(&TypeInfo::object("Person"), "name")
            .expect("reader");

        assert_eq!(writer.write(&person, "Ada".into()), Ok(Value::Null));
        assert_eq!(writer.write(&person, "Grace".into()), Ok(Value::from("Ada")));
        assert_eq!(reader.read(&person), Ok(Value::from("Grace")));
    }

    #[test]
    fn test_subclass_relation() {
        let model = model();
        assert!(model.is_subclass_of("Person", "Party"));
        assert!(model.is_subclass_of("Person", "Person"));
        assert!(!model.is_subclass_of("Party", "Person"));
    }

    #[test]
    fn test_factory() {
        let model = model();
        assert!(matches!(
            model.create(&TypeInfo::object("Party")),
            Err(CreationError::Abstract { .. })
        ));
        assert!(matches!(
            model.create(&TypeInfo::String),
            Err(CreationError::NoDefaultForm { .. })
        ));
        let address = model.create(&TypeInfo::object("Address")).unwrap();
        assert_eq!(address.type_info(), TypeInfo::object("Address"));
    }

    #[test]
    fn test_map_owner_entries() {
        let model = model();
        let map = Value::map([("sku", Value::from("A-1"))]);
        let reader = model
            .resolve_read(&map.type_info(), "sku")
            .expect("entry reader");
        assert_eq!(reader.read(&map), Ok(Value::from("A-1")));
    }
}
