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

//! Function registry and the path function contract

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::evaluator::NavigationContext;
use crate::model::{TypeInfo, Value};

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Function registration and evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// A function is already bound to the name
    #[error("Function '{name}' is already registered")]
    Duplicate {
        /// Function name
        name: String,
    },

    /// The function cannot be used as a write target
    #[error("Function '{name}' does not support writes")]
    ReadOnly {
        /// Function name
        name: String,
    },

    /// Invalid number of arguments
    #[error("Function '{name}' expects {min}-{} arguments, got {actual}", max.map_or("∞".to_string(), |n| n.to_string()))]
    InvalidArity {
        /// Function name
        name: String,
        /// Minimum arguments
        min: usize,
        /// Maximum arguments (None for unlimited)
        max: Option<usize>,
        /// Actual arguments provided
        actual: usize,
    },

    /// Invalid argument type
    #[error("Function '{name}' argument {index} expects {expected}, got {actual}")]
    InvalidArgumentType {
        /// Function name
        name: String,
        /// Argument index
        index: usize,
        /// Expected type
        expected: String,
        /// Actual type
        actual: String,
    },

    /// Runtime evaluation error
    #[error("Function '{name}' evaluation error: {message}")]
    EvaluationError {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },
}

/// A named capability that replaces plain member access for a segment
///
/// Functions are registered once and shared across calls; they must not keep
/// per-call state.
pub trait PathFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Get function documentation
    fn documentation(&self) -> &str {
        ""
    }

    /// Type of the value produced when applied to an owner of type `owner`
    ///
    /// Used to instantiate missing intermediates and to resolve declared
    /// types without reading values.
    fn result_type(&self, _owner: &TypeInfo) -> TypeInfo {
        TypeInfo::Any
    }

    /// Type incoming values are converted to before [`PathFunction::write`]
    fn accepted_type(&self, _owner: &TypeInfo) -> Option<TypeInfo> {
        None
    }

    /// Read through the function
    fn read(
        &self,
        target: &Value,
        args: &[Value],
        context: &NavigationContext,
    ) -> FunctionResult<Value>;

    /// Write through the function, returning the previously held value
    fn write(
        &self,
        _target: &Value,
        _args: &[Value],
        _value: Value,
        _context: &NavigationContext,
    ) -> FunctionResult<Value> {
        Err(FunctionError::ReadOnly {
            name: self.name().to_string(),
        })
    }

    /// Validate the argument count
    fn validate_arity(&self, args: &[Value], min: usize, max: Option<usize>) -> FunctionResult<()> {
        if args.len() < min || max.is_some_and(|max| args.len() > max) {
            return Err(FunctionError::InvalidArity {
                name: self.name().to_string(),
                min,
                max,
                actual: args.len(),
            });
        }
        Ok(())
    }
}

/// Registry mapping segment names to functions
///
/// Populated at composition time and then shared read-only, typically behind
/// an `Arc`, by every navigation.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<dyn PathFunction>>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in collection functions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtin_functions(&mut registry);
        registry
    }

    /// Bind `function` to `name`
    pub fn register<F: PathFunction + 'static>(
        &mut self,
        name: impl Into<String>,
        function: F,
    ) -> FunctionResult<()> {
        self.register_shared(name, Arc::new(function))
    }

    /// Bind an already shared function to `name`
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        function: Arc<dyn PathFunction>,
    ) -> FunctionResult<()> {
        let name = name.into();
        if self.functions.contains_key(&name) {
            return Err(FunctionError::Duplicate { name });
        }
        log::debug!("Registered path function '{name}'");
        self.functions.insert(name, function);
        Ok(())
    }

    /// Bind `function` under its own name
    pub fn register_function<F: PathFunction + 'static>(&mut self, function: F) -> FunctionResult<()> {
        let name = function.name().to_string();
        self.register(name, function)
    }

    /// Find the function bound to `name`
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn PathFunction>> {
        self.functions.get(name)
    }

    /// Whether a function is bound to `name`
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no function is registered
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Register the built-in collection functions
pub fn register_builtin_functions(registry: &mut FunctionRegistry) {
    use crate::registry::functions::collection::{
        AtFunction, FirstFunction, LastFunction, SizeFunction,
    };

    for function in [
        Arc::new(FirstFunction) as Arc<dyn PathFunction>,
        Arc::new(LastFunction),
        Arc::new(AtFunction),
        Arc::new(SizeFunction),
    ] {
        let name = function.name().to_string();
        if let Err(err) = registry.register_shared(name, function) {
            log::warn!("Skipping built-in function: {err}");
        }
    }
}
