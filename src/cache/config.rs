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

//! Cache configuration options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for path caching behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether parsed expressions are cached
    pub enabled: bool,

    /// Maximum number of parsed expressions kept
    pub max_expressions: usize,

    /// Whether path nodes reuse previously resolved accessors
    pub node_cache: bool,

    /// Optional TTL for cached expressions
    pub entry_ttl: Option<Duration>,
}

impl CacheConfig {
    /// Create a new cache configuration with custom settings
    pub fn new(max_expressions: usize, node_cache: bool, entry_ttl: Option<Duration>) -> Self {
        Self {
            enabled: true,
            max_expressions,
            node_cache,
            entry_ttl,
        }
    }

    /// Create a configuration optimized for high performance
    pub fn high_performance() -> Self {
        Self {
            enabled: true,
            max_expressions: 10_000,
            node_cache: true,
            entry_ttl: None,
        }
    }

    /// Create a configuration with caching disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_expressions: 0,
            node_cache: false,
            entry_ttl: None,
        }
    }

    /// Create a configuration for testing
    pub fn testing() -> Self {
        Self {
            enabled: true,
            max_expressions: 16,
            node_cache: true,
            entry_ttl: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_expressions: 1_000,
            node_cache: true,
            entry_ttl: Some(Duration::from_secs(3600)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_expressions, 1_000);
        assert!(config.node_cache);
        assert_eq!(config.entry_ttl, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_cache_config_high_performance() {
        let config = CacheConfig::high_performance();
        assert_eq!(config.max_expressions, 10_000);
        assert_eq!(config.entry_ttl, None);
    }

    #[test]
    fn test_cache_config_disabled() {
        let config = CacheConfig::disabled();
        assert!(!config.enabled);
        assert!(!config.node_cache);
    }

    #[test]
    fn test_cache_config_from_json() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"max_expressions": 5, "node_cache": false}"#).unwrap();
        assert_eq!(config.max_expressions, 5);
        assert!(!config.node_cache);
        assert!(config.enabled);
    }
}
