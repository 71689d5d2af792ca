//! Thread-safe engine handle

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::sql::Statement;

use super::{CacheStats, Engine, Outcome};

/// Cloneable handle to one engine
///
/// Each call holds the lock for exactly one statement, so statements from
/// different threads are serialized and never interleave.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::from(Engine::new(config)?))
    }

    pub fn execute_sql(&self, sql: &str) -> Result<Outcome> {
        self.inner.lock().execute_sql(sql)
    }

    pub fn execute(&self, statement: &Statement) -> Result<Outcome> {
        self.inner.lock().execute(statement)
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.inner.lock().cache_stats()
    }

    /// Run `f` with exclusive access to the engine
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut Engine) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl From<Engine> for SharedEngine {
    fn from(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }
}
