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

//! at(n) function - the element at a position

use super::{list_target, replace_element};
use crate::evaluator::NavigationContext;
use crate::model::{TypeInfo, Value};
use crate::registry::function::{FunctionError, FunctionResult, PathFunction};

/// at(n) function - reads or replaces the element at position `n`
pub struct AtFunction;

impl AtFunction {
    fn index(&self, args: &[Value]) -> FunctionResult<usize> {
        self.validate_arity(args, 1, Some(1))?;
        args[0]
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| FunctionError::InvalidArgumentType {
                name: self.name().to_string(),
                index: 0,
                expected: "non-negative Integer".to_string(),
                actual: args[0].to_string(),
            })
    }
}

impl PathFunction for AtFunction {
    fn name(&self) -> &str {
        "at"
    }

    fn documentation(&self) -> &str {
        "The element at the given zero-based position, or null when out of range. Writing past the end grows the list."
    }

    fn result_type(&self, owner: &TypeInfo) -> TypeInfo {
        owner.element_type_or_any()
    }

    fn accepted_type(&self, owner: &TypeInfo) -> Option<TypeInfo> {
        owner.element_type().cloned()
    }

    fn read(&self, target: &Value, args: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        let index = self.index(args)?;
        Ok(list_target(self.name(), target)?.get(index).unwrap_or_default())
    }

    fn write(
        &self,
        target: &Value,
        args: &[Value],
        value: Value,
        _: &NavigationContext,
    ) -> FunctionResult<Value> {
        let index = self.index(args)?;
        replace_element(self.name(), list_target(self.name(), target)?, index, value)
    }
}
