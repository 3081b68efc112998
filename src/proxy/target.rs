// Proxy targets.
// Parses a repository URL into owner/repo and derives the cache keys for it.

use url::Url;

use crate::error::{FolioError, Result};

/// Rejection for a request without a usable `url` parameter.
pub const MISSING_URL: &str = "Missing url query param";

/// A repository addressed by a proxy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
}

impl RepoTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse the `url` query parameter.
    ///
    /// Accepts any absolute URL whose path starts with `/{owner}/{repo}`;
    /// further segments are ignored.
    pub fn from_query(url: Option<&str>) -> Result<Self> {
        let raw = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| FolioError::InvalidInput(MISSING_URL.to_string()))?;

        let parsed = Url::parse(raw)
            .map_err(|_| FolioError::InvalidInput("Invalid GitHub repo URL".to_string()))?;

        let mut segments = parsed.path().trim_matches('/').split('/');
        match (segments.next(), segments.next()) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(FolioError::InvalidInput(
                "Invalid GitHub repo URL".to_string(),
            )),
        }
    }

    /// `owner/repo`.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn summary_key(&self) -> String {
        format!("repo:{}", self.slug())
    }

    pub fn readme_images_key(&self) -> String {
        format!("readmeImages:{}", self.slug())
    }
}

/// Key under which a failed summary request is recorded.
pub fn summary_error_key(raw_url: Option<&str>) -> String {
    match raw_url {
        Some(url) => format!("repo:error:{}", url),
        None => "error".to_string(),
    }
}
