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

//! Navigation mode and the per-call collaborator bundle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::ResolutionCache;
use crate::error::{NavigationError, NavigationResult};
use crate::model::{ContainerFactory, ObjectFactory, ObjectModel, StandardConverter, ValueConverter};
use crate::path::PathExpression;

/// Policy for a null value met at a non-final segment
///
/// The mode never changes the outcome at the final segment of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationMode {
    /// Stop and yield null
    #[default]
    ReturnNull,
    /// Raise a segment-null error
    FailOnNull,
    /// Instantiate the missing value, install it, and continue
    CreateOnNull,
}

impl NavigationMode {
    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMode::ReturnNull => "RETURN_NULL",
            NavigationMode::FailOnNull => "FAIL_ON_NULL",
            NavigationMode::CreateOnNull => "CREATE_ON_NULL",
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown navigation mode name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown navigation mode '{value}'")]
pub struct ParseModeError {
    /// The rejected name
    pub value: String,
}

impl FromStr for NavigationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            NavigationMode::ReturnNull,
            NavigationMode::FailOnNull,
            NavigationMode::CreateOnNull,
        ]
        .into_iter()
        .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| ParseModeError {
            value: s.to_string(),
        })
    }
}

/// Collaborators handed to every navigation call
///
/// The context is immutable during a call and cheap to clone; the navigator
/// keeps no per-call state outside of it.
#[derive(Clone)]
pub struct NavigationContext {
    factory: Arc<dyn ObjectFactory>,
    converter: Arc<dyn ValueConverter>,
    cache: Option<Arc<ResolutionCache>>,
    default_mode: NavigationMode,
}

impl NavigationContext {
    /// Create a context without a resolution cache
    pub fn new(factory: Arc<dyn ObjectFactory>, converter: Arc<dyn ValueConverter>) -> Self {
        Self {
            factory,
            converter,
            cache: None,
            default_mode: NavigationMode::default(),
        }
    }

    /// Context whose factory and converter are backed by `model`
    pub fn for_model(model: Arc<ObjectModel>) -> Self {
        let converter = Arc::new(StandardConverter::with_model(Arc::clone(&model)));
        Self::new(model, converter)
    }

    /// Attach a shared resolution cache
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the mode used by calls that do not pick one
    pub fn with_default_mode(mut self, mode: NavigationMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Mode used by calls that do not pick one
    pub fn default_mode(&self) -> NavigationMode {
        self.default_mode
    }

    /// Object construction service
    pub fn factory(&self) -> &dyn ObjectFactory {
        self.factory.as_ref()
    }

    /// Value conversion service
    pub fn converter(&self) -> &dyn ValueConverter {
        self.converter.as_ref()
    }

    /// Shared resolution cache, if any
    pub fn cache(&self) -> Option<&Arc<ResolutionCache>> {
        self.cache.as_ref()
    }

    /// Whether path nodes may reuse resolved accessors
    pub fn node_cache_enabled(&self) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| cache.node_cache_enabled())
    }

    /// Parse `path` through the cache, or afresh when there is none
    pub fn expression(&self, path: &str) -> NavigationResult<Arc<PathExpression>> {
        let parsed = match &self.cache {
            Some(cache) => cache.get_or_parse(path),
            None => PathExpression::parse(path).map(Arc::new),
        };
        parsed.map_err(|err| NavigationError::malformed(path, err))
    }
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new(Arc::new(ContainerFactory), Arc::new(StandardConverter::new()))
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("cache", &self.cache.as_ref().map(|cache| cache.stats()))
            .field("node_cache", &self.node_cache_enabled())
            .field("default_mode", &self.default_mode)
            .finish()
    }
}
