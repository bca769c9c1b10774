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

//! Navigator configuration
//!
//! ```json
//! { "default_mode": "CREATE_ON_NULL", "cache": { "max_expressions": 500 } }
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::{CacheConfig, ResolutionCache};
use crate::evaluator::{NavigationContext, NavigationMode};
use crate::model::ObjectModel;

/// Settings for a navigator deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Mode callers use when they do not pick one
    pub default_mode: NavigationMode,
    /// Resolution cache settings
    pub cache: CacheConfig,
}

impl NavigatorConfig {
    /// Load from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set the default mode
    pub fn with_mode(mut self, mode: NavigationMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Set the cache configuration
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Build a resolution cache from these settings
    pub fn build_cache(&self) -> ResolutionCache {
        ResolutionCache::with_config(self.cache.clone())
    }

    /// Set the default mode on `context` and attach a freshly built cache,
    /// unless caching is off entirely
    pub fn apply(&self, context: NavigationContext) -> NavigationContext {
        let context = context.with_default_mode(self.default_mode);
        if self.cache.enabled || self.cache.node_cache {
            context.with_cache(Arc::new(self.build_cache()))
        } else {
            context
        }
    }

    /// Context backed by `model`, configured by these settings
    pub fn context_for_model(&self, model: Arc<ObjectModel>) -> NavigationContext {
        self.apply(NavigationContext::for_model(model))
    }
}
