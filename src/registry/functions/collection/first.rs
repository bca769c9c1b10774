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

//! first() function - the first element of a list

use super::{list_target, replace_element};
use crate::evaluator::NavigationContext;
use crate::model::{TypeInfo, Value};
use crate::registry::function::{FunctionResult, PathFunction};

/// first() function - reads or replaces the first element of a list
pub struct FirstFunction;

impl PathFunction for FirstFunction {
    fn name(&self) -> &str {
        "first"
    }

    fn documentation(&self) -> &str {
        "The first element of the list, or null when the list is empty. Writing replaces the first element, or appends to an empty list."
    }

    fn result_type(&self, owner: &TypeInfo) -> TypeInfo {
        owner.element_type_or_any()
    }

    fn accepted_type(&self, owner: &TypeInfo) -> Option<TypeInfo> {
        owner.element_type().cloned()
    }

    fn read(&self, target: &Value, args: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        self.validate_arity(args, 0, Some(0))?;
        Ok(list_target(self.name(), target)?.get(0).unwrap_or_default())
    }

    fn write(
        &self,
        target: &Value,
        args: &[Value],
        value: Value,
        _: &NavigationContext,
    ) -> FunctionResult<Value> {
        self.validate_arity(args, 0, Some(0))?;
        replace_element(self.name(), list_target(self.name(), target)?, 0, value)
    }
}
