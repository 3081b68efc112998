// Fetch cache proxy.
// Serves repository summaries and README image lists from cache, falling back to GitHub on a miss.

pub mod readme;
pub mod scrape;
pub mod summary;
pub mod target;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{Clock, RedisTier, SystemClock, TierStatus, TieredCache};
use crate::config::{Config, UpstreamConfig};
use crate::error::Result;
use crate::github::{GitHubClient, RepoSource};

pub use readme::{ImagesResponse, collect_images, extract_image_targets, normalize_image_target};
pub use scrape::{PageMeta, scrape_page_meta};
pub use summary::{RepoSummary, SummaryResponse};
pub use target::{MISSING_URL, RepoTarget, summary_error_key};

/// Time-to-live for each kind of stored result.
pub mod ttl {
    use std::time::Duration;

    pub const SUMMARY_SUCCESS: Duration = Duration::from_secs(3600);
    pub const SUMMARY_PARTIAL: Duration = Duration::from_secs(1800);
    pub const SUMMARY_RATE_LIMITED: Duration = Duration::from_secs(60);
    pub const SUMMARY_ERROR: Duration = Duration::from_secs(300);

    pub const README_SUCCESS: Duration = Duration::from_secs(7200);
    pub const README_EMPTY: Duration = Duration::from_secs(3600);
    pub const README_ERROR: Duration = Duration::from_secs(600);
}

/// How a response was produced; reported in the `X-Cache` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Fallback,
    RateLimited,
    Error,
    Empty,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Fallback => "FALLBACK",
            CacheStatus::RateLimited => "RATE-LIMITED",
            CacheStatus::Error => "ERROR",
            CacheStatus::Empty => "EMPTY",
        }
    }
}

/// A proxy result with its cache disposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    pub body: T,
    pub status: CacheStatus,
    /// TTL the result was (or had been) stored with.
    pub ttl: Duration,
    /// Entry age; only set on a hit.
    pub age: Option<Duration>,
}

impl<T> Served<T> {
    pub fn fresh(body: T, status: CacheStatus, ttl: Duration) -> Self {
        Self {
            body,
            status,
            ttl,
            age: None,
        }
    }

    pub fn hit(body: T, ttl: Duration, age: Duration) -> Self {
        Self {
            body,
            status: CacheStatus::Hit,
            ttl,
            age: Some(age),
        }
    }
}

/// The proxy service: a tiered cache in front of a repository source.
#[derive(Clone)]
pub struct RepoProxy {
    cache: TieredCache,
    source: Arc<dyn RepoSource>,
    upstream: UpstreamConfig,
}

impl RepoProxy {
    pub fn new(cache: TieredCache, source: Arc<dyn RepoSource>, upstream: UpstreamConfig) -> Self {
        Self {
            cache,
            source,
            upstream,
        }
    }

    /// Build the production proxy: GitHub over HTTP, local map, and Redis when configured.
    ///
    /// A Redis connection failure is logged and the proxy runs on the local tier alone.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let mut cache = TieredCache::in_memory(clock);

        if let Some(url) = &config.redis_url {
            match RedisTier::connect(url).await {
                Ok(tier) => cache = cache.with_tier(Arc::new(tier)),
                Err(e) => warn!("External cache tier not available, using in-memory cache: {}", e),
            }
        } else {
            info!("REDIS_URL not set, using in-memory cache only");
        }

        let client = GitHubClient::new(&config.upstream)?;
        Ok(Self::new(cache, Arc::new(client), config.upstream.clone()))
    }

    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn tier_status(&self) -> Vec<TierStatus> {
        self.cache.tier_status()
    }

    fn preview_image(&self, target: &RepoTarget) -> String {
        format!("{}/{}", self.upstream.preview_base, target.slug())
    }

    fn repo_page_url(&self, target: &RepoTarget) -> String {
        format!("{}/{}", self.upstream.web_base, target.slug())
    }
}
