// Tiered cache store.
// Reads tiers in order until one yields a decodable, unexpired envelope; writes go to every tier.

use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::Result;

use super::clock::Clock;
use super::entry::CachedData;
use super::tier::{CacheTier, MemoryTier};

/// A value served from cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit<T> {
    pub value: T,
    /// Time since the value was stored.
    pub age: Duration,
    /// TTL the value was stored with, when the envelope recorded one.
    pub ttl: Option<Duration>,
    /// Tier that served the value.
    pub tier: &'static str,
}

impl<T> CacheHit<T> {
    /// Age in whole seconds.
    pub fn age_secs(&self) -> u64 {
        self.age.as_secs()
    }
}

/// Name and availability of one configured tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierStatus {
    pub name: &'static str,
    pub available: bool,
}

/// Ordered list of cache tiers sharing one clock.
#[derive(Clone)]
pub struct TieredCache {
    tiers: Vec<Arc<dyn CacheTier>>,
    clock: Arc<dyn Clock>,
}

impl TieredCache {
    /// Create an empty tier list.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tiers: Vec::new(),
            clock,
        }
    }

    /// Create a tier list holding just the process-local map.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let memory = Arc::new(MemoryTier::new(clock.clone()));
        Self::new(clock).with_tier(memory)
    }

    /// Append a tier; tiers are consulted in insertion order.
    pub fn with_tier(mut self, tier: Arc<dyn CacheTier>) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn tier_status(&self) -> Vec<TierStatus> {
        self.tiers
            .iter()
            .map(|tier| TierStatus {
                name: tier.name(),
                available: tier.is_available(),
            })
            .collect()
    }

    /// Look up `key`, returning the first usable hit.
    ///
    /// Unavailable tiers are skipped. Tier errors, undecodable payloads, and
    /// envelopes past their recorded TTL all count as a miss for that tier.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheHit<T>> {
        let now = self.clock.now();

        for tier in &self.tiers {
            if !tier.is_available() {
                debug!("Skipping unavailable cache tier {}", tier.name());
                continue;
            }

            let raw = match tier.get(key).await {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Cache tier {} read failed for {}: {}", tier.name(), key, e);
                    continue;
                }
            };

            let data: CachedData<T> = match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    debug!("Discarding undecodable entry {} from {}: {}", key, tier.name(), e);
                    continue;
                }
            };

            if data.is_expired(now) {
                continue;
            }

            return Some(CacheHit {
                age: data.age(now),
                ttl: data.ttl(),
                value: data.value,
                tier: tier.name(),
            });
        }

        None
    }

    /// Store `value` under `key` in every tier.
    ///
    /// The first tier is written unconditionally. Later tiers are best-effort:
    /// write failures are logged and swallowed. Only a serialization failure
    /// is returned.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let data = CachedData::new(value, self.clock.now(), ttl);
        let payload = serde_json::to_string(&data)?;

        for (index, tier) in self.tiers.iter().enumerate() {
            if index > 0 && !tier.is_available() {
                continue;
            }
            if let Err(e) = tier.set(key, &payload, ttl).await {
                warn!("Cache tier {} write failed for {}: {}", tier.name(), key, e);
            }
        }

        Ok(())
    }
}
