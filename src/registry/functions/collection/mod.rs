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

//! Collection functions operating on the list they are applied to

mod at;
mod first;
mod last;
mod size;

pub use at::AtFunction;
pub use first::FirstFunction;
pub use last::LastFunction;
pub use size::SizeFunction;

use crate::model::{ListRef, Value};
use crate::registry::function::{FunctionError, FunctionResult};

/// The list a collection function is applied to
fn list_target<'a>(name: &str, target: &'a Value) -> FunctionResult<&'a ListRef> {
    target.as_list().ok_or_else(|| FunctionError::EvaluationError {
        name: name.to_string(),
        message: format!("expected a List, got {}", target.type_name()),
    })
}

/// Replace the element at `index`, reporting list growth failures
fn replace_element(name: &str, list: &ListRef, index: usize, value: Value) -> FunctionResult<Value> {
    list.set(index, value)
        .map_err(|err| FunctionError::EvaluationError {
            name: name.to_string(),
            message: err.to_string(),
        })
}
