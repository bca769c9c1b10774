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

//! Shared cache of parsed path expressions
//!
//! Paths are parsed once per distinct string and handed out as shared
//! [`PathExpression`]s, so the per-node accessor caches of a path are reused
//! by every navigation of that string.

pub mod config;

pub use config::CacheConfig;

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::parser::ParseResult;
use crate::path::PathExpression;

/// Statistics about the resolution cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries currently cached
    pub entries: usize,
    /// Number of entries evicted
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            (self.hits as f64) / ((self.hits + self.misses) as f64) * 100.0
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    expression: Arc<PathExpression>,
    created_at: Instant,
    last_accessed: Instant,
}

impl CacheEntry {
    fn new(expression: Arc<PathExpression>) -> Self {
        let now = Instant::now();
        Self {
            expression,
            created_at: now,
            last_accessed: now,
        }
    }

    fn access(&mut self) -> Arc<PathExpression> {
        self.last_accessed = Instant::now();
        Arc::clone(&self.expression)
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Thread-safe cache from path strings to parsed expressions
#[derive(Debug)]
pub struct ResolutionCache {
    entries: DashMap<String, CacheEntry>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ResolutionCache {
    /// Create a cache with default configuration
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Whether path nodes should reuse resolved accessors
    pub fn node_cache_enabled(&self) -> bool {
        self.config.node_cache
    }

    /// Get a cached expression
    pub fn get(&self, path: &str) -> Option<Arc<PathExpression>> {
        if !self.config.enabled {
            return None;
        }

        if let Some(mut entry) = self.entries.get_mut(path) {
            if let Some(ttl) = self.config.entry_ttl {
                if entry.is_expired(ttl) {
                    drop(entry);
                    self.entries.remove(path);
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }

            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(entry.access())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Return the cached expression for `path`, parsing and caching it on a miss
    ///
    /// Concurrent misses on the same string may parse twice; all callers end
    /// up with the expression that was stored first.
    pub fn get_or_parse(&self, path: &str) -> ParseResult<Arc<PathExpression>> {
        if let Some(expression) = self.get(path) {
            return Ok(expression);
        }

        let parsed = Arc::new(PathExpression::parse(path)?);
        if !self.config.enabled || self.config.max_expressions == 0 {
            return Ok(parsed);
        }

        if self.entries.len() >= self.config.max_expressions {
            self.evict_lru_entries();
        }

        log::debug!("Caching parsed path '{path}'");
        let entry = self
            .entries
            .entry(path.to_string())
            .or_insert_with(|| CacheEntry::new(parsed));
        Ok(Arc::clone(&entry.expression))
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Number of cached expressions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries
    pub fn cleanup(&self) {
        if let Some(ttl) = self.config.entry_ttl {
            self.entries.retain(|_, entry| !entry.is_expired(ttl));
        }
    }

    /// Evict the least recently used fifth of the entries
    fn evict_lru_entries(&self) {
        let mut entries: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().last_accessed))
            .collect();

        entries.sort_by_key(|(_, last_accessed)| *last_accessed);

        let remove_count = (self.config.max_expressions / 5).max(1);
        for (key, _) in entries.into_iter().take(remove_count) {
            self.entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
