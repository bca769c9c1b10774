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

//! Write navigation
//!
//! A write reaches the parent of the final segment with `CREATE_ON_NULL`
//! forced, then performs exactly one mutation at the final segment. The
//! caller's mode only decides what happens when the parent cannot be
//! reached: `RETURN_NULL` skips the write, the other modes fail.

use log::{debug, trace};

use super::context::{NavigationContext, NavigationMode};
use super::engine::{Cursor, PathNavigator, access_failed, convert_value};
use crate::error::{NavigationError, NavigationResult};
use crate::model::Value;
use crate::parser::ParseError;
use crate::path::{PathExpression, PathNode};

impl PathNavigator {
    /// Write `value` at `path`, returning the value previously held there
    ///
    /// The value is converted to the declared type of the target member, the
    /// element type of the target container (`Any` when unknown), or the type
    /// a registered function accepts.
    ///
    /// Intermediates are created and installed one at a time while the parent
    /// is reached. When a later step fails, those already installed stay in the
    /// graph, including when `RETURN_NULL` turns the failure into a skipped
    /// write returning `Null`.
    pub fn write(
        &self,
        root: &Value,
        path: &PathExpression,
        mode: NavigationMode,
        context: &NavigationContext,
        value: Value,
    ) -> NavigationResult<Value> {
        let Some((leaf, parents)) = path.split_leaf() else {
            return Err(NavigationError::malformed(path.source(), ParseError::Empty));
        };
        trace!("Writing '{path}' ({mode})");

        if root.is_null() {
            self.null_root(path, mode)?;
            debug!("Write to '{path}' skipped: null root");
            return Ok(Value::Null);
        }

        let parent = match self.walk(root, parents, NavigationMode::CreateOnNull, context, false) {
            Ok(Some(parent)) => parent,
            Ok(None) => return Ok(Value::Null),
            Err(err) if mode == NavigationMode::ReturnNull && err.is_unreachable() => {
                debug!("Write to '{path}' skipped: {err}");
                return Ok(Value::Null);
            }
            Err(err) => return Err(err),
        };

        self.write_leaf(&parent, leaf, value, context)
    }

    /// Parse `path` through the context cache and [`write`](Self::write) it
    pub fn write_path(
        &self,
        root: &Value,
        path: &str,
        mode: NavigationMode,
        context: &NavigationContext,
        value: Value,
    ) -> NavigationResult<Value> {
        let expression = context.expression(path)?;
        self.write(root, &expression, mode, context, value)
    }

    /// [`write_path`](Self::write_path) in the context's default mode
    pub fn write_default(
        &self,
        root: &Value,
        path: &str,
        context: &NavigationContext,
        value: Value,
    ) -> NavigationResult<Value> {
        self.write_path(root, path, context.default_mode(), context, value)
    }

    fn write_leaf(
        &self,
        parent: &Cursor,
        leaf: &PathNode,
        value: Value,
        context: &NavigationContext,
    ) -> NavigationResult<Value> {
        let Some(selector) = leaf.segment().selector() else {
            return self.write_member(parent, leaf, value, context, true);
        };

        let member = self.read_member(parent, leaf, context)?;
        let Some(container) =
            self.ensure_container(parent, leaf, member, NavigationMode::CreateOnNull, context)?
        else {
            return Ok(Value::Null);
        };

        let elements = self.element_accessor(&container, leaf)?;
        let value = convert_value(context, value, &container.ty.element_type_or_any())?;
        elements
            .put(&container.value, &selector, value)
            .map_err(|err| access_failed(leaf.segment(), &container.ty, err))
    }
}
