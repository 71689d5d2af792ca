//! Configuration for ArborDB
//!
//! Centralized configuration with sensible defaults.

use crate::error::{ArborError, Result};

/// Smallest order for which split and merge stay well defined
pub const MIN_BTREE_ORDER: usize = 3;

/// Main configuration for an ArborDB engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Order of every B+Tree the engine creates (max keys per node + 1)
    pub btree_order: usize,

    // -------------------------------------------------------------------------
    // Query Cache Configuration
    // -------------------------------------------------------------------------
    /// Whether full-table SELECT results are memoized
    pub query_cache_enabled: bool,

    /// Max number of cached result sets before LRU eviction
    pub query_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            btree_order: 32,
            query_cache_enabled: true,
            query_cache_capacity: 10_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the settings can back a working engine
    pub fn validate(&self) -> Result<()> {
        if self.btree_order < MIN_BTREE_ORDER {
            return Err(ArborError::Config(format!(
                "btree_order must be at least {}, got {}",
                MIN_BTREE_ORDER, self.btree_order
            )));
        }

        if self.query_cache_enabled && self.query_cache_capacity == 0 {
            return Err(ArborError::Config(
                "query_cache_capacity must be non-zero when the cache is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the B+Tree order used for row stores and indexes
    pub fn btree_order(mut self, order: usize) -> Self {
        self.config.btree_order = order;
        self
    }

    /// Enable or disable the query cache
    pub fn query_cache_enabled(mut self, enabled: bool) -> Self {
        self.config.query_cache_enabled = enabled;
        self
    }

    /// Set the query cache capacity (in result sets)
    pub fn query_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.query_cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
