// Cache tier capability and the process-local implementation.
// A tier stores opaque serialized envelopes under string keys with a TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

use super::clock::Clock;
use super::entry::CacheEntry;

/// One cache backend in the tier list.
#[async_trait]
pub trait CacheTier: Send + Sync {
    /// Short name used in logs and health output.
    fn name(&self) -> &'static str;

    /// Whether the tier should be consulted right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Fetch a serialized envelope. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a serialized envelope for `ttl`.
    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<()>;
}

/// In-memory key to entry map.
///
/// No capacity bound: keys are limited to the repositories the site links to.
/// Expired entries are removed lazily when read.
pub struct MemoryTier {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryTier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Raw access to a stored entry without expiry checks.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheTier for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now();
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.payload.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(payload.to_string(), self.clock.now(), ttl);
        self.lock().insert(key.to_string(), entry);
        Ok(())
    }
}
