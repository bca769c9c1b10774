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

//! Path nodes with per-node accessor caching
//!
//! A node remembers the accessor resolved the last time it was navigated,
//! together with the owner type it was resolved for. A later navigation
//! reuses it only when the owner type matches; otherwise the node resolves
//! again and the newer resolution replaces the old one.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use super::segment::Segment;
use crate::model::{ReadAccessor, TypeInfo};

/// Accessor resolved for a node against a particular owner type
#[derive(Debug)]
pub struct NodeResolution {
    owner: TypeInfo,
    reader: Arc<dyn ReadAccessor>,
    value_type: TypeInfo,
}

impl NodeResolution {
    /// Create a resolution
    ///
    /// `value_type` is the type the segment yields: the member type for plain
    /// properties, the element type for indexed and mapped segments.
    pub fn new(owner: TypeInfo, reader: Arc<dyn ReadAccessor>, value_type: TypeInfo) -> Self {
        Self {
            owner,
            reader,
            value_type,
        }
    }

    /// Owner type the accessor was resolved for
    pub fn owner(&self) -> &TypeInfo {
        &self.owner
    }

    /// Erased class of the owner
    pub fn owner_class(&self) -> &str {
        self.owner.class_name()
    }

    /// The member accessor
    pub fn reader(&self) -> &Arc<dyn ReadAccessor> {
        &self.reader
    }

    /// Declared type of the member itself
    pub fn member_type(&self) -> &TypeInfo {
        self.reader.declared_type()
    }

    /// Type produced by the segment
    pub fn value_type(&self) -> &TypeInfo {
        &self.value_type
    }
}

/// One segment of a parsed path, linked to its predecessor
pub struct PathNode {
    segment: Segment,
    parent: Option<Arc<PathNode>>,
    depth: usize,
    resolution: RwLock<Option<Arc<NodeResolution>>>,
}

impl PathNode {
    pub(crate) fn new(segment: Segment, parent: Option<Arc<PathNode>>) -> Self {
        let depth = parent.as_ref().map_or(0, |p| p.depth + 1);
        Self {
            segment,
            parent,
            depth,
            resolution: RwLock::new(None),
        }
    }

    /// The segment this node navigates
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Predecessor node, `None` for the first segment
    pub fn parent(&self) -> Option<&Arc<PathNode>> {
        self.parent.as_ref()
    }

    /// Zero-based position in the path
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this is the first segment
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Canonical path text from the first segment up to this node
    pub fn qualified_path(&self) -> String {
        let mut chain = Vec::with_capacity(self.depth + 1);
        let mut current = Some(self);
        while let Some(node) = current {
            chain.push(node.segment.to_string());
            current = node.parent.as_deref();
        }
        chain.reverse();
        chain.join(".")
    }

    /// Cached resolution, if one exists for `owner`
    pub fn cached_resolution(&self, owner: &TypeInfo) -> Option<Arc<NodeResolution>> {
        self.resolution
            .read()
            .as_ref()
            .filter(|resolution| resolution.owner == *owner)
            .cloned()
    }

    /// Store a resolution, replacing whatever was cached before
    pub fn store_resolution(&self, resolution: NodeResolution) -> Arc<NodeResolution> {
        let resolution = Arc::new(resolution);
        *self.resolution.write() = Some(Arc::clone(&resolution));
        resolution
    }

    /// Value type from the most recent resolution
    pub fn cached_type(&self) -> Option<TypeInfo> {
        self.resolution
            .read()
            .as_ref()
            .map(|resolution| resolution.value_type.clone())
    }

    /// Erased value class from the most recent resolution
    pub fn cached_class(&self) -> Option<String> {
        self.resolution
            .read()
            .as_ref()
            .map(|resolution| resolution.value_type.class_name().to_string())
    }

    /// Drop the cached resolution
    pub fn clear_cache(&self) {
        *self.resolution.write() = None;
    }
}

impl fmt::Debug for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathNode")
            .field("segment", &self.segment)
            .field("depth", &self.depth)
            .field("cached_type", &self.cached_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessorResolver, ClassDefinition, ObjectModel};

    fn model() -> ObjectModel {
        ObjectModel::builder()
            .class(ClassDefinition::new("Person").property("name", TypeInfo::String))
            .class(ClassDefinition::new("Pet").property("name", TypeInfo::String))
            .build()
    }

    #[test]
    fn test_qualified_path() {
        let root = Arc::new(PathNode::new(
            Segment::Indexed {
                name: "items".into(),
                index: 0,
            },
            None,
        ));
        let leaf = PathNode::new(Segment::Property { name: "sku".into() }, Some(root));
        assert_eq!(leaf.qualified_path(), "items[0].sku");
        assert_eq!(leaf.depth(), 1);
        assert!(!leaf.is_root());
    }

    #[test]
    fn test_cache_is_keyed_by_owner() {
        let model = model();
        let node = PathNode::new(Segment::Property { name: "name".into() }, None);
        let person = TypeInfo::object("Person");
        let pet = TypeInfo::object("Pet");

        assert!(node.cached_resolution(&person).is_none());

        let reader = model.resolve_read(&person, "name").unwrap();
        node.store_resolution(NodeResolution::new(person.clone(), reader, TypeInfo::String));
        assert!(node.cached_resolution(&person).is_some());
        assert!(node.cached_resolution(&pet).is_none());
        assert_eq!(node.cached_type(), Some(TypeInfo::String));

        let reader = model.resolve_read(&pet, "name").unwrap();
        node.store_resolution(NodeResolution::new(pet.clone(), reader, TypeInfo::String));
        assert!(node.cached_resolution(&person).is_none());
        assert_eq!(
            node.cached_resolution(&pet).unwrap().owner_class(),
            "Pet"
        );

        node.clear_cache();
        assert_eq!(node.cached_class(), None);
    }
}
