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

//! Read navigation
//!
//! The navigator walks a [`PathExpression`] from the root to the leaf. Each
//! segment is a member step (plain accessor or registered function) followed,
//! for indexed and mapped segments, by an element step on the container the
//! member yields. Null values met before the leaf are handled by the active
//! [`NavigationMode`].
//!
//! Concurrent calls against the same object graph are not serialized here;
//! the graph's own handles are the only synchronization.

use log::{debug, trace};
use std::sync::Arc;

use super::context::{NavigationContext, NavigationMode};
use crate::error::{NavigationError, NavigationResult};
use crate::model::{AccessError, AccessorResolver, ElementAccessor, TypeInfo, Value};
use crate::path::{NodeResolution, PathExpression, PathNode, Segment};
use crate::registry::FunctionRegistry;

/// A value and the type navigation treats it as
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    pub(crate) value: Value,
    pub(crate) ty: TypeInfo,
}

impl Cursor {
    /// Objects are typed by their runtime class; containers keep the declared
    /// element type; nulls keep the declared type so they can be created.
    pub(crate) fn typed(value: Value, declared: &TypeInfo) -> Self {
        let ty = match (&value, declared) {
            (Value::Null, declared) => declared.clone(),
            (Value::List(_), TypeInfo::List(_)) | (Value::Map(_), TypeInfo::Map(_)) => {
                declared.clone()
            }
            (value, _) => value.type_info(),
        };
        Self { value, ty }
    }

    pub(crate) fn root(value: &Value) -> Self {
        Self {
            ty: value.type_info(),
            value: value.clone(),
        }
    }
}

pub(crate) fn access_failed(segment: &Segment, owner: &TypeInfo, err: AccessError) -> NavigationError {
    NavigationError::Access {
        member: segment.to_string(),
        owner_type: owner.type_name(),
        reason: err.to_string(),
    }
}

fn unresolved(segment: &Segment, owner: &TypeInfo, reason: &str) -> NavigationError {
    NavigationError::Access {
        member: segment.to_string(),
        owner_type: owner.type_name(),
        reason: reason.to_string(),
    }
}

pub(crate) fn convert_value(
    context: &NavigationContext,
    value: Value,
    target: &TypeInfo,
) -> NavigationResult<Value> {
    let value_type = value.type_name();
    context
        .converter()
        .convert(value, target)
        .map_err(|err| NavigationError::Conversion {
            value_type,
            target_type: target.type_name(),
            reason: err.to_string(),
        })
}

/// Stateless path navigator
///
/// Holds only the accessor resolver and the function registry, both shared
/// read-only, so one navigator can serve any number of threads.
#[derive(Clone)]
pub struct PathNavigator {
    resolver: Arc<dyn AccessorResolver>,
    functions: Arc<FunctionRegistry>,
}

impl PathNavigator {
    /// Navigator without path functions
    pub fn new(resolver: Arc<dyn AccessorResolver>) -> Self {
        Self::with_functions(resolver, Arc::new(FunctionRegistry::new()))
    }

    /// Navigator consulting `functions` before plain member access
    pub fn with_functions(
        resolver: Arc<dyn AccessorResolver>,
        functions: Arc<FunctionRegistry>,
    ) -> Self {
        Self {
            resolver,
            functions,
        }
    }

    /// The accessor resolver
    pub fn resolver(&self) -> &Arc<dyn AccessorResolver> {
        &self.resolver
    }

    /// The function registry
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Read the value at `path`; null when absent
    pub fn read(
        &self,
        root: &Value,
        path: &PathExpression,
        mode: NavigationMode,
        context: &NavigationContext,
    ) -> NavigationResult<Value> {
        trace!("Reading '{path}' ({mode})");
        if root.is_null() {
            return self.null_root(path, mode).map(|_| Value::Null);
        }
        Ok(self
            .walk(root, path.nodes(), mode, context, true)?
            .map(|cursor| cursor.value)
            .unwrap_or_default())
    }

    /// Read the value at `path` converted to `target`
    pub fn read_as(
        &self,
        root: &Value,
        path: &PathExpression,
        mode: NavigationMode,
        context: &NavigationContext,
        target: &TypeInfo,
    ) -> NavigationResult<Value> {
        let value = self.read(root, path, mode, context)?;
        convert_value(context, value, target)
    }

    /// Declared type of the value at `path`, without reading or creating values
    ///
    /// Types follow declarations from the root's runtime type, so members
    /// that exist only on a subclass of a declared type are not reachable.
    /// `None` means the type could not be determined under `RETURN_NULL`.
    pub fn resolve_type(
        &self,
        root: &Value,
        path: &PathExpression,
        mode: NavigationMode,
        context: &NavigationContext,
    ) -> NavigationResult<Option<TypeInfo>> {
        if root.is_null() {
            return self.null_root(path, mode).map(|_| None);
        }

        let mut ty = root.type_info();
        for node in path.nodes() {
            match self.declared_type(&ty, node, context) {
                Ok(next) => {
                    trace!("'{}' declares {next}", node.qualified_path());
                    ty = next;
                }
                Err(err) if mode == NavigationMode::ReturnNull && err.is_unreachable() => {
                    trace!("Type of '{path}' unresolved: {err}");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(Some(ty))
    }

    /// Parse `path` through the context cache and [`read`](Self::read) it
    pub fn read_path(
        &self,
        root: &Value,
        path: &str,
        mode: NavigationMode,
        context: &NavigationContext,
    ) -> NavigationResult<Value> {
        let expression = context.expression(path)?;
        self.read(root, &expression, mode, context)
    }

    /// [`read_path`](Self::read_path) in the context's default mode
    pub fn read_default(
        &self,
        root: &Value,
        path: &str,
        context: &NavigationContext,
    ) -> NavigationResult<Value> {
        self.read_path(root, path, context.default_mode(), context)
    }

    /// Parse `path` through the context cache and [`read_as`](Self::read_as) it
    pub fn read_path_as(
        &self,
        root: &Value,
        path: &str,
        mode: NavigationMode,
        context: &NavigationContext,
        target: &TypeInfo,
    ) -> NavigationResult<Value> {
        let expression = context.expression(path)?;
        self.read_as(root, &expression, mode, context, target)
    }

    /// Parse `path` through the context cache and resolve its declared type
    pub fn resolve_path_type(
        &self,
        root: &Value,
        path: &str,
        mode: NavigationMode,
        context: &NavigationContext,
    ) -> NavigationResult<Option<TypeInfo>> {
        let expression = context.expression(path)?;
        self.resolve_type(root, &expression, mode, context)
    }

    /// A null root has nothing to navigate or create into
    pub(crate) fn null_root(&self, path: &PathExpression, mode: NavigationMode) -> NavigationResult<()> {
        match (mode, path.nodes().first()) {
            (NavigationMode::ReturnNull, _) | (_, None) => Ok(()),
            (_, Some(first)) => Err(NavigationError::SegmentNull {
                segment: first.segment().to_string(),
                path: first.qualified_path(),
                owner_type: "null root".to_string(),
            }),
        }
    }

    /// Walk `nodes` from a non-null root
    ///
    /// With `leaf_included`, a null produced by the last node is the result;
    /// otherwise every node counts as an intermediate.
    pub(crate) fn walk(
        &self,
        root: &Value,
        nodes: &[Arc<PathNode>],
        mode: NavigationMode,
        context: &NavigationContext,
        leaf_included: bool,
    ) -> NavigationResult<Option<Cursor>> {
        let mut current = Cursor::root(root);
        let last = nodes.len().saturating_sub(1);

        for (i, node) in nodes.iter().enumerate() {
            let intermediate = !(leaf_included && i == last);
            match self.step(&current, node, mode, context, intermediate)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    fn step(
        &self,
        owner: &Cursor,
        node: &PathNode,
        mode: NavigationMode,
        context: &NavigationContext,
        intermediate: bool,
    ) -> NavigationResult<Option<Cursor>> {
        let member = self.read_member(owner, node, context)?;
        trace!("'{}' yields {}", node.qualified_path(), member.ty);

        let Some(selector) = node.segment().selector() else {
            if intermediate && member.value.is_null() {
                return self.fill_null(owner, node, mode, context, &member.ty, |created| {
                    self.write_member(owner, node, created, context, false)
                });
            }
            return Ok(Some(member));
        };

        let Some(container) = self.ensure_container(owner, node, member, mode, context)? else {
            return Ok(None);
        };
        let elements = self.element_accessor(&container, node)?;
        let element = elements
            .get(&container.value, &selector)
            .map_err(|err| access_failed(node.segment(), &container.ty, err))?;
        let element = Cursor::typed(element, &container.ty.element_type_or_any());

        if intermediate && element.value.is_null() {
            return self.fill_null(&container, node, mode, context, &element.ty, |created| {
                elements
                    .put(&container.value, &selector, created)
                    .map_err(|err| access_failed(node.segment(), &container.ty, err))
            });
        }
        Ok(Some(element))
    }

    /// Apply `mode` to a null met at `node`; `install` stores a created value
    pub(crate) fn fill_null(
        &self,
        owner: &Cursor,
        node: &PathNode,
        mode: NavigationMode,
        context: &NavigationContext,
        declared: &TypeInfo,
        install: impl FnOnce(Value) -> NavigationResult<Value>,
    ) -> NavigationResult<Option<Cursor>> {
        match mode {
            NavigationMode::ReturnNull => {
                trace!("'{}' is null, stopping", node.qualified_path());
                Ok(None)
            }
            NavigationMode::FailOnNull => Err(NavigationError::SegmentNull {
                segment: node.segment().to_string(),
                path: node.qualified_path(),
                owner_type: owner.ty.type_name(),
            }),
            NavigationMode::CreateOnNull => {
                let created =
                    context
                        .factory()
                        .create(declared)
                        .map_err(|err| NavigationError::ObjectCreation {
                            segment: node.segment().to_string(),
                            type_name: declared.type_name(),
                            reason: err.to_string(),
                        })?;
                install(created.clone())?;
                debug!("Created {declared} at '{}'", node.qualified_path());
                Ok(Some(Cursor::typed(created, declared)))
            }
        }
    }

    /// The container an indexed or mapped segment selects from
    pub(crate) fn ensure_container(
        &self,
        owner: &Cursor,
        node: &PathNode,
        member: Cursor,
        mode: NavigationMode,
        context: &NavigationContext,
    ) -> NavigationResult<Option<Cursor>> {
        if !member.value.is_null() {
            return Ok(Some(member));
        }
        self.fill_null(owner, node, mode, context, &member.ty, |created| {
            self.write_member(owner, node, created, context, false)
        })
    }

    pub(crate) fn element_accessor(
        &self,
        container: &Cursor,
        node: &PathNode,
    ) -> NavigationResult<Arc<dyn ElementAccessor>> {
        self.resolver
            .resolve_element(&container.ty)
            .ok_or_else(|| unresolved(node.segment(), &container.ty, "not an element container"))
    }

    /// Member step: registered function first, accessor otherwise
    pub(crate) fn read_member(
        &self,
        owner: &Cursor,
        node: &PathNode,
        context: &NavigationContext,
    ) -> NavigationResult<Cursor> {
        let segment = node.segment();
        if let Some(function) = self.functions.lookup(segment.name()) {
            let value = function.read(&owner.value, segment.args(), context)?;
            return Ok(Cursor::typed(value, &function.result_type(&owner.ty)));
        }

        let resolution = self.resolve_member(&owner.ty, node, context)?;
        let value = resolution
            .reader()
            .read(&owner.value)
            .map_err(|err| access_failed(segment, &owner.ty, err))?;
        Ok(Cursor::typed(value, resolution.member_type()))
    }

    /// Install `value` through the member step, returning the previous value
    ///
    /// With `convert`, the value is first converted to the type the writer or
    /// function accepts.
    pub(crate) fn write_member(
        &self,
        owner: &Cursor,
        node: &PathNode,
        value: Value,
        context: &NavigationContext,
        convert: bool,
    ) -> NavigationResult<Value> {
        let segment = node.segment();
        if let Some(function) = self.functions.lookup(segment.name()) {
            let value = match function.accepted_type(&owner.ty) {
                Some(accepted) if convert => convert_value(context, value, &accepted)?,
                _ => value,
            };
            return Ok(function.write(&owner.value, segment.args(), value, context)?);
        }
        if segment.is_function() {
            return Err(unresolved(segment, &owner.ty, "no function registered"));
        }

        let writer = self
            .resolver
            .resolve_write(&owner.ty, segment.name())
            .ok_or_else(|| unresolved(segment, &owner.ty, "no writable member"))?;
        let value = if convert {
            convert_value(context, value, writer.declared_type())?
        } else {
            value
        };
        writer
            .write(&owner.value, value)
            .map_err(|err| access_failed(segment, &owner.ty, err))
    }

    /// Resolve the read accessor for `node` on `owner`, via the node cache
    /// when the context enables it
    fn resolve_member(
        &self,
        owner: &TypeInfo,
        node: &PathNode,
        context: &NavigationContext,
    ) -> NavigationResult<Arc<NodeResolution>> {
        let segment = node.segment();
        if segment.is_function() {
            return Err(unresolved(segment, owner, "no function registered"));
        }

        let caching = context.node_cache_enabled();
        if caching {
            if let Some(cached) = node.cached_resolution(owner) {
                return Ok(cached);
            }
        }

        let reader = self
            .resolver
            .resolve_read(owner, segment.name())
            .ok_or_else(|| unresolved(segment, owner, "no readable member"))?;
        let value_type = if segment.selector().is_some() {
            reader.declared_type().element_type_or_any()
        } else {
            reader.declared_type().clone()
        };
        let resolution = NodeResolution::new(owner.clone(), reader, value_type);

        if caching {
            debug!("Caching accessor for '{}' on {owner}", node.qualified_path());
            Ok(node.store_resolution(resolution))
        } else {
            Ok(Arc::new(resolution))
        }
    }

    fn declared_type(
        &self,
        owner: &TypeInfo,
        node: &PathNode,
        context: &NavigationContext,
    ) -> NavigationResult<TypeInfo> {
        let segment = node.segment();
        let member = match self.functions.lookup(segment.name()) {
            Some(function) => function.result_type(owner),
            None => {
                let resolution = self.resolve_member(owner, node, context)?;
                if segment.selector().is_none() {
                    return Ok(resolution.value_type().clone());
                }
                resolution.member_type().clone()
            }
        };

        match segment.selector() {
            None => Ok(member),
            Some(_) => {
                if self.resolver.resolve_element(&member).is_none() {
                    return Err(unresolved(segment, &member, "not an element container"));
                }
                Ok(member.element_type_or_any())
            }
        }
    }
}

impl std::fmt::Debug for PathNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathNavigator")
            .field("functions", &self.functions)
            .finish()
    }
}
