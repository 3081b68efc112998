// Repository summary lookup.
// Cache, then the metadata API, then a scrape of the repository page.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::github::{RepoLookup, Repository};

use super::scrape::scrape_page_meta;
use super::target::{RepoTarget, summary_error_key};
use super::{CacheStatus, RepoProxy, Served, ttl};

/// Normalized repository metadata.
///
/// Every field always serializes; unknown values are `null`. When `error` is
/// set the record is degraded, not absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    pub name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub url: Option<String>,
    pub homepage: Option<String>,
    pub owner_avatar: Option<String>,
    pub preview_image: Option<String>,
    pub error: Option<String>,
}

impl RepoSummary {
    /// A record carrying only an error.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// The record stored while the upstream API is rate limiting us.
    pub fn rate_limited(repo: &str) -> Self {
        Self {
            name: Some(repo.to_string()),
            error: Some("Rate limited".to_string()),
            ..Self::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary endpoint body: the summary plus cache annotations on a hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: RepoSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<u64>,
}

impl SummaryResponse {
    pub fn fresh(summary: RepoSummary) -> Self {
        Self {
            summary,
            cached: None,
            cache_age: None,
        }
    }

    pub fn cached(summary: RepoSummary, age_secs: u64) -> Self {
        Self {
            summary,
            cached: Some(true),
            cache_age: Some(age_secs),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RepoProxy {
    /// Summary for `target`, from cache or upstream.
    ///
    /// Rate limiting and upstream failures are absorbed into degraded records;
    /// an `Err` means the request could not be served at all.
    pub async fn repo_summary(&self, target: &RepoTarget) -> Result<Served<SummaryResponse>> {
        let key = target.summary_key();

        if let Some(hit) = self.cache.get::<RepoSummary>(&key).await {
            let ttl = hit.ttl.unwrap_or(ttl::SUMMARY_SUCCESS);
            let age_secs = hit.age_secs();
            let body = SummaryResponse::cached(hit.value, age_secs);
            return Ok(Served::hit(body, ttl, hit.age));
        }

        let (summary, status, ttl) = match self.source.repository(&target.owner, &target.repo).await
        {
            Ok(RepoLookup::Found(repository)) => (
                self.summary_from_api(target, repository),
                CacheStatus::Miss,
                ttl::SUMMARY_SUCCESS,
            ),
            Ok(RepoLookup::RateLimited(_)) => {
                warn!("Rate limited for {}", target.slug());
                (
                    RepoSummary::rate_limited(&target.repo),
                    CacheStatus::RateLimited,
                    ttl::SUMMARY_RATE_LIMITED,
                )
            }
            Ok(RepoLookup::Unavailable { status }) => {
                info!("Metadata API returned {} for {}, scraping page", status, target.slug());
                (
                    self.summary_from_page(target).await?,
                    CacheStatus::Fallback,
                    ttl::SUMMARY_PARTIAL,
                )
            }
            Err(e) => {
                info!("Metadata API failed for {} ({}), scraping page", target.slug(), e);
                (
                    self.summary_from_page(target).await?,
                    CacheStatus::Fallback,
                    ttl::SUMMARY_PARTIAL,
                )
            }
        };

        self.cache.set(&key, &summary, ttl).await?;
        Ok(Served::fresh(SummaryResponse::fresh(summary), status, ttl))
    }

    /// Best-effort record of a summary request that failed outright.
    pub async fn record_summary_failure(&self, raw_url: Option<&str>) {
        let key = summary_error_key(raw_url);
        let record = RepoSummary::failure("Internal error");
        if let Err(e) = self.cache.set(&key, &record, ttl::SUMMARY_ERROR).await {
            warn!("Could not cache failure for {}: {}", key, e);
        }
    }

    fn summary_from_api(&self, target: &RepoTarget, repository: Repository) -> RepoSummary {
        RepoSummary {
            name: non_empty(repository.name),
            description: non_empty(repository.description),
            language: non_empty(repository.language),
            stars: repository.stargazers_count,
            forks: repository.forks_count,
            url: non_empty(repository.html_url).or_else(|| Some(self.repo_page_url(target))),
            homepage: non_empty(repository.homepage),
            owner_avatar: repository.owner.and_then(|o| non_empty(o.avatar_url)),
            preview_image: Some(self.preview_image(target)),
            error: None,
        }
    }

    async fn summary_from_page(&self, target: &RepoTarget) -> Result<RepoSummary> {
        let html = self
            .source
            .repository_page(&target.owner, &target.repo)
            .await?;
        let meta = scrape_page_meta(&html);

        Ok(RepoSummary {
            name: meta.title.or_else(|| Some(target.repo.clone())),
            description: meta.description,
            url: Some(self.repo_page_url(target)),
            homepage: meta.homepage,
            preview_image: Some(self.preview_image(target)),
            ..RepoSummary::default()
        })
    }
}
