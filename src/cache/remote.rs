// External key-value cache tier backed by Redis.
// Best-effort: failures flip the tier to unavailable and are re-probed after a cool-down.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::{info, warn};

use crate::error::Result;

use super::tier::CacheTier;

/// Reconnect attempts before the client gives up on a command.
const MAX_RETRIES: usize = 3;
/// Backoff factor in milliseconds (attempt n waits factor * 2^n).
const BACKOFF_FACTOR_MS: u64 = 100;
/// Cap on a single reconnect delay.
const MAX_BACKOFF_MS: u64 = 2000;
/// How long an unhealthy tier is skipped before it is tried again.
const REPROBE_AFTER: Duration = Duration::from_secs(30);

/// Health flag for a tier that can drop out and come back.
#[derive(Debug)]
pub struct TierHealth {
    healthy: AtomicBool,
    last_failure: Mutex<Option<Instant>>,
    reprobe_after: Duration,
}

impl TierHealth {
    pub fn new(reprobe_after: Duration) -> Self {
        Self {
            healthy: AtomicBool::new(true),
            last_failure: Mutex::new(None),
            reprobe_after,
        }
    }

    /// Record a successful operation. Returns true if the tier just recovered.
    pub fn mark_ok(&self) -> bool {
        !self.healthy.swap(true, Ordering::SeqCst)
    }

    /// Record a failed operation. Returns true if the tier just went down.
    pub fn mark_failed(&self) -> bool {
        *self.last_failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
        self.healthy.swap(false, Ordering::SeqCst)
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Healthy, or unhealthy long enough that another attempt is due.
    pub fn is_available(&self) -> bool {
        if self.is_healthy() {
            return true;
        }
        let last_failure = *self.last_failure.lock().unwrap_or_else(|e| e.into_inner());
        match last_failure {
            Some(at) => at.elapsed() >= self.reprobe_after,
            None => true,
        }
    }
}

/// Redis-backed tier using an auto-reconnecting connection manager.
pub struct RedisTier {
    manager: ConnectionManager,
    health: TierHealth,
}

impl RedisTier {
    /// Connect to the store named by `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_factor(BACKOFF_FACTOR_MS)
            .set_max_delay(MAX_BACKOFF_MS)
            .set_number_of_retries(MAX_RETRIES);
        let manager = ConnectionManager::new_with_config(client, config).await?;

        info!("Connected to external cache tier");

        Ok(Self {
            manager,
            health: TierHealth::new(REPROBE_AFTER),
        })
    }

    fn record<T>(&self, op: &str, result: &redis::RedisResult<T>) {
        match result {
            Ok(_) => {
                if self.health.mark_ok() {
                    info!("External cache tier recovered");
                }
            }
            Err(e) => {
                if self.health.mark_failed() {
                    warn!("External cache tier unavailable ({} failed): {}", op, e);
                } else {
                    warn!("External cache {} error: {}", op, e);
                }
            }
        }
    }
}

#[async_trait]
impl CacheTier for RedisTier {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn is_available(&self) -> bool {
        self.health.is_available()
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let result: redis::RedisResult<Option<String>> = conn.get(key).await;
        self.record("get", &result);
        Ok(result?)
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        let result: redis::RedisResult<()> = conn.set_ex(key, payload, seconds).await;
        self.record("set", &result);
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_starts_available() {
        let health = TierHealth::new(Duration::from_secs(30));
        assert!(health.is_healthy());
        assert!(health.is_available());
    }

    #[test]
    fn test_failure_makes_tier_unavailable_until_reprobe() {
        let health = TierHealth::new(Duration::from_secs(3600));
        assert!(health.mark_failed());
        assert!(!health.is_healthy());
        assert!(!health.is_available());

        // A second failure is not a new transition.
        assert!(!health.mark_failed());
    }

    #[test]
    fn test_reprobe_after_cooldown() {
        let health = TierHealth::new(Duration::ZERO);
        health.mark_failed();
        assert!(!health.is_healthy());
        assert!(health.is_available());
    }

    #[test]
    fn test_recovery_transition() {
        let health = TierHealth::new(Duration::from_secs(30));
        assert!(!health.mark_ok());
        health.mark_failed();
        assert!(health.mark_ok());
        assert!(health.is_available());
    }
}
