// README image extraction.
// Finds the default branch, probes README casings on the raw host, and normalizes image references.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::github::{RepoLookup, raw_file_url};

use super::target::RepoTarget;
use super::{CacheStatus, RepoProxy, Served, ttl};

/// README filenames tried in order.
pub const README_CANDIDATES: [&str; 4] = ["README.md", "README.MD", "readme.md", "Readme.md"];

const DEFAULT_BRANCH: &str = "main";

static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").expect("valid markdown image pattern"));

static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["'][^>]*>"#).expect("valid img tag pattern")
});

/// README images endpoint body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImagesResponse {
    pub fn new(images: Vec<String>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Raw image targets in document order: Markdown images first, then `<img>` tags.
pub fn extract_image_targets(text: &str) -> Vec<String> {
    let markdown = MARKDOWN_IMAGE.captures_iter(text);
    let html = HTML_IMAGE.captures_iter(text);

    markdown
        .chain(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Turn one extracted target into an absolute URL.
///
/// Takes the token before any whitespace (dropping Markdown titles) and strips
/// angle brackets. Absolute URLs are kept; anything else is a path inside the
/// repository on `branch`.
pub fn normalize_image_target(
    target: &str,
    raw_base: &str,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Option<String> {
    let token = target.split_whitespace().next()?;
    let token = token.strip_prefix('<').unwrap_or(token);
    let token = token.strip_suffix('>').unwrap_or(token);
    if token.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(token) {
        return Some(url.to_string());
    }

    let path = match token.strip_prefix('.') {
        Some(rest) if rest.starts_with('/') => rest,
        _ => token,
    };
    let path = path.trim_start_matches('/');
    Some(raw_file_url(raw_base, owner, repo, branch, path))
}

/// Extract, normalize, dedupe (first occurrence wins) and drop `data:` URLs.
pub fn collect_images(
    text: &str,
    raw_base: &str,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_image_targets(text)
        .iter()
        .filter_map(|t| normalize_image_target(t, raw_base, owner, repo, branch))
        .filter(|url| seen.insert(url.clone()))
        .filter(|url| !url.starts_with("data:"))
        .collect()
}

impl RepoProxy {
    /// Image URLs referenced by the repository README, from cache or upstream.
    pub async fn readme_images(&self, target: &RepoTarget) -> Result<Served<ImagesResponse>> {
        let key = target.readme_images_key();

        if let Some(hit) = self.cache.get::<Vec<String>>(&key).await {
            let ttl = hit.ttl.unwrap_or(ttl::README_SUCCESS);
            let body = ImagesResponse {
                images: hit.value,
                cached: Some(true),
                error: None,
            };
            return Ok(Served::hit(body, ttl, hit.age));
        }

        let branch = match self.source.repository(&target.owner, &target.repo).await {
            Ok(RepoLookup::Found(repository)) => repository
                .default_branch
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            Ok(other) => {
                warn!("No repository metadata for {}: {:?}", target.slug(), other);
                return self
                    .store_images(&key, Vec::new(), CacheStatus::Error, ttl::README_ERROR)
                    .await;
            }
            Err(e) => {
                warn!("Repository metadata lookup failed for {}: {}", target.slug(), e);
                return self
                    .store_images(&key, Vec::new(), CacheStatus::Error, ttl::README_ERROR)
                    .await;
            }
        };

        let Some(readme) = self.find_readme(target, &branch).await else {
            debug!("No README found for {} on {}", target.slug(), branch);
            return self.store_images(&key, Vec::new(), CacheStatus::Empty, ttl::README_EMPTY).await;
        };

        let images = collect_images(
            &readme,
            &self.upstream.raw_base,
            &target.owner,
            &target.repo,
            &branch,
        );
        let ttl = if images.is_empty() {
            ttl::README_EMPTY
        } else {
            ttl::README_SUCCESS
        };
        self.store_images(&key, images, CacheStatus::Miss, ttl).await
    }

    /// First README casing that resolves on the raw host.
    async fn find_readme(&self, target: &RepoTarget, branch: &str) -> Option<String> {
        for name in README_CANDIDATES {
            match self
                .source
                .raw_file(&target.owner, &target.repo, branch, name)
                .await
            {
                Ok(Some(text)) => return Some(text),
                Ok(None) => continue,
                Err(e) => {
                    debug!("Fetching {} for {} failed: {}", name, target.slug(), e);
                    continue;
                }
            }
        }
        None
    }

    async fn store_images(
        &self,
        key: &str,
        images: Vec<String>,
        status: CacheStatus,
        ttl: std::time::Duration,
    ) -> Result<Served<ImagesResponse>> {
        self.cache.set(key, &images, ttl).await?;
        Ok(Served::fresh(ImagesResponse::new(images), status, ttl))
    }
}
