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

//! last() function - the last element of a list

use super::{list_target, replace_element};
use crate::evaluator::NavigationContext;
use crate::model::{TypeInfo, Value};
use crate::registry::function::{FunctionResult, PathFunction};

/// last() function - reads or replaces the last element of a list
pub struct LastFunction;

impl PathFunction for LastFunction {
    fn name(&self) -> &str {
        "last"
    }

    fn documentation(&self) -> &str {
        "The last element of the list, or null when the list is empty. Writing replaces the last element, or appends to an empty list."
    }

    fn result_type(&self, owner: &TypeInfo) -> TypeInfo {
        owner.element_type_or_any()
    }

    fn accepted_type(&self, owner: &TypeInfo) -> Option<TypeInfo> {
        owner.element_type().cloned()
    }

    fn read(&self, target: &Value, args: &[Value], _: &NavigationContext) -> FunctionResult<Value> {
        self.validate_arity(args, 0, Some(0))?;
        let list = list_target(self.name(), target)?;
        Ok(list
            .len()
            .checked_sub(1)
            .and_then(|last| list.get(last))
            .unwrap_or_default())
    }

    fn write(
        &self,
        target: &Value,
        args: &[Value],
        value: Value,
        _: &NavigationContext,
    ) -> FunctionResult<Value> {
        self.validate_arity(args, 0, Some(0))?;
        let list = list_target(self.name(), target)?;
        let index = list.len().saturating_sub(1);
        replace_element(self.name(), list, index, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last() {
        let context = NavigationContext::default();
        let list = Value::list(vec!["a".into(), "b".into()]);

        assert_eq!(LastFunction.read(&list, &[], &context), Ok(Value::from("b")));
        assert_eq!(
            LastFunction.write(&list, &[], "z".into(), &context),
            Ok(Value::from("b"))
        );
        assert_eq!(list.as_list().unwrap().to_vec(), vec![Value::from("a"), Value::from("z")]);
    }

    #[test]
    fn test_last_on_empty_list_appends() {
        let context = NavigationContext::default();
        let list = Value::list(vec![]);

        assert_eq!(LastFunction.read(&list, &[], &context), Ok(Value::Null));
        assert_eq!(
            LastFunction.write(&list, &[], Value::from(1), &context),
            Ok(Value::Null)
        );
        assert_eq!(list.as_list().unwrap().len(), 1);
    }
}
