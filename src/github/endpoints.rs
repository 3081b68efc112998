// GitHub endpoint functions.
// The `RepoSource` capability consumed by the proxy, and its implementation over HTTP.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{ApiErrorBody, RateLimit, RepoLookup, Repository};

/// Upstream data the proxy needs about a repository.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Look up repository metadata.
    ///
    /// Non-success statuses come back as `RepoLookup` variants; `Err` means
    /// the request itself failed (network, undecodable body).
    async fn repository(&self, owner: &str, repo: &str) -> Result<RepoLookup>;

    /// Fetch a file from the raw-content host. `Ok(None)` when it does not resolve.
    async fn raw_file(&self, owner: &str, repo: &str, branch: &str, path: &str)
    -> Result<Option<String>>;

    /// Fetch the rendered repository page, whatever its status.
    async fn repository_page(&self, owner: &str, repo: &str) -> Result<String>;
}

/// Decide whether a failed metadata response was caused by rate limiting.
///
/// Only 403 and 429 qualify. Headers are checked first; the error message
/// text is a fallback for responses that omit them.
pub fn is_rate_limited(status: StatusCode, rate_limit: &RateLimit, body: &str) -> bool {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return false;
    }
    if rate_limit.is_exhausted() {
        return true;
    }

    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .is_some_and(|message| message.to_lowercase().contains("rate limit"))
}

/// Classify a non-success metadata response.
pub fn classify_failure(status: StatusCode, rate_limit: RateLimit, body: &str) -> RepoLookup {
    if is_rate_limited(status, &rate_limit, body) {
        RepoLookup::RateLimited(rate_limit)
    } else {
        RepoLookup::Unavailable {
            status: status.as_u16(),
        }
    }
}

/// Turn a metadata response into a lookup outcome. A 200 body must decode.
pub fn classify_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> Result<RepoLookup> {
    if status == StatusCode::OK {
        let repository: Repository = serde_json::from_str(body)?;
        return Ok(RepoLookup::Found(repository));
    }
    Ok(classify_failure(status, RateLimit::from_headers(headers), body))
}

/// Contents of a raw-file response; `None` unless the status is a success.
pub fn raw_file_contents(status: StatusCode, body: String) -> Option<String> {
    status.is_success().then_some(body)
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn repository(&self, owner: &str, repo: &str) -> Result<RepoLookup> {
        let response = self
            .api_get(&format!("/repos/{}/{}", owner, repo))
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = if status == StatusCode::OK {
            response.text().await?
        } else {
            response.text().await.unwrap_or_default()
        };
        classify_response(status, &headers, &body)
    }

    async fn raw_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        let response = self.raw_get(owner, repo, branch, path).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(raw_file_contents(status, body))
    }

    async fn repository_page(&self, owner: &str, repo: &str) -> Result<String> {
        let response = self.page_get(owner, repo).send().await?;
        Ok(response.text().await?)
    }
}
