// Cache entry types.
// The serialized envelope shared by every tier, plus the expiry-tracked slot of the local map.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for cached data with metadata.
///
/// This is the wire shape written to every tier:
/// `{"value": ..., "createdAt": <epoch ms>, "ttl": <seconds>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedData<T> {
    /// The cached payload.
    pub value: T,
    /// When the payload was stored, in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// TTL the payload was stored with, in seconds.
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl<T> CachedData<T> {
    /// Create a new envelope stamped at `now`.
    pub fn new(value: T, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            created_at: now.timestamp_millis(),
            ttl: Some(ttl.as_secs()),
        }
    }

    /// Age of the payload relative to `now`. Future timestamps count as zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let elapsed_ms = now.timestamp_millis().saturating_sub(self.created_at);
        Duration::from_millis(elapsed_ms.max(0) as u64)
    }

    /// TTL the payload was stored with, if recorded.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_secs)
    }

    /// Check whether the recorded TTL has run out at `now`.
    ///
    /// Envelopes without a TTL are left to the tier's own expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.ttl() {
            Some(ttl) => self.age(now) > ttl,
            None => false,
        }
    }
}

/// One slot of the process-local tier.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Serialized `CachedData` envelope.
    pub payload: String,
    pub created_at: DateTime<Utc>,
    /// `created_at + ttl`; the entry is invalid once now is past this.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(payload: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            payload,
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
