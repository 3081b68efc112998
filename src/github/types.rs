// GitHub API response types.
// The subset of the repository payload the proxy reads, plus rate-limit bookkeeping.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Repository owner as embedded in a repository payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

/// GitHub repository.
///
/// Every field is optional: the proxy degrades gracefully on sparse payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub html_url: Option<String>,
    pub homepage: Option<String>,
    pub default_branch: Option<String>,
    pub owner: Option<Owner>,
}

/// Error body returned by the API on failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset: Option<u64>,
    /// Seconds from a `retry-after` header (secondary rate limits).
    pub retry_after: Option<u64>,
}

impl RateLimit {
    /// Read rate limit headers from a response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        };

        Self {
            limit: number("x-ratelimit-limit"),
            remaining: number("x-ratelimit-remaining"),
            reset: number("x-ratelimit-reset"),
            retry_after: number("retry-after"),
        }
    }

    /// Whether the headers alone say the quota is spent.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0) || self.retry_after.is_some()
    }
}

/// Outcome of a repository metadata lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoLookup {
    /// HTTP 200 with a decoded payload.
    Found(Repository),
    /// 403/429 caused by rate limiting.
    RateLimited(RateLimit),
    /// Any other non-success status.
    Unavailable { status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_repository_sparse_payload() {
        let repo: Repository = serde_json::from_str(
            r#"{"name":"jolt","stargazers_count":12,"owner":{"login":"phatblat"},"extra":true}"#,
        )
        .unwrap();

        assert_eq!(repo.name.as_deref(), Some("jolt"));
        assert_eq!(repo.stargazers_count, Some(12));
        assert!(repo.forks_count.is_none());
        assert!(repo.owner.unwrap().avatar_url.is_none());
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let rate = RateLimit::from_headers(&headers);
        assert_eq!(rate.limit, Some(60));
        assert_eq!(rate.remaining, Some(0));
        assert_eq!(rate.reset, Some(1_700_000_000));
        assert!(rate.is_exhausted());
    }

    #[test]
    fn test_rate_limit_missing_headers() {
        let rate = RateLimit::from_headers(&HeaderMap::new());
        assert_eq!(rate, RateLimit::default());
        assert!(!rate.is_exhausted());
    }

    #[test]
    fn test_retry_after_counts_as_exhausted() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("30"));
        assert!(RateLimit::from_headers(&headers).is_exhausted());
    }
}
