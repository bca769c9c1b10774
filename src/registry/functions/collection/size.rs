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

//! size() function - element count

use crate::evaluator::NavigationContext;
use crate::model::{TypeInfo, Value};
use crate::registry::function::{FunctionError, FunctionResult, PathFunction};

/// size() function - number of list elements, map entries or characters
pub struct SizeFunction;

impl PathFunction for SizeFunction {
    fn name(&self) -> &str {
        "size"
    }

    fn documentation(&self) -> &str {
        "Number of elements in a list, entries in a map, or characters in a string. Read-only."
    }

    fn result_type(&self, _owner: &TypeInfo) -> TypeInfo {
        TypeInfo::Integer
    }

    fn read(&self, target: &Value, args: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        self.validate_arity(args, 0, Some(0))?;
        let count = match target {
            Value::List(list) => list.len(),
            Value::Map(map) => map.len(),
            Value::String(text) => text.chars().count(),
            other => {
                return Err(FunctionError::EvaluationError {
                    name: self.name().to_string(),
                    message: format!("cannot count {}", other.type_name()),
                });
            }
        };
        i64::try_from(count)
            .map(Value::Integer)
            .map_err(|_| FunctionError::EvaluationError {
                name: self.name().to_string(),
                message: "count exceeds Integer range".to_string(),
            })
    }
}
