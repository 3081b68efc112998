// GitHub HTTP client.
// Holds the shared reqwest client and the base URLs of the API, raw-content host, and web pages.

use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::config::UpstreamConfig;
use crate::error::{FolioError, Result};

const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = "folio-portfolio";

/// GitHub client for the metadata API, raw file host, and repository pages.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    upstream: UpstreamConfig,
    auth: Option<HeaderValue>,
}

impl GitHubClient {
    /// Create a new client for the given upstream endpoints.
    pub fn new(upstream: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FolioError::Http)?;

        let auth = upstream
            .token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| FolioError::Config(e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            client,
            upstream: upstream.clone(),
            auth,
        })
    }

    pub fn upstream(&self) -> &UpstreamConfig {
        &self.upstream
    }

    /// GET request against the metadata API.
    pub(crate) fn api_get(&self, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upstream.api_base, endpoint);
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        if let Some(auth) = &self.auth {
            request = request.header(AUTHORIZATION, auth.clone());
        }
        request
    }

    /// GET request against the raw-content host.
    pub(crate) fn raw_get(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> RequestBuilder {
        self.client
            .get(raw_file_url(&self.upstream.raw_base, owner, repo, branch, path))
    }

    /// GET request for a rendered repository page.
    pub(crate) fn page_get(&self, owner: &str, repo: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/{}/{}", self.upstream.web_base, owner, repo))
            .header(ACCEPT, "text/html")
    }
}

/// Absolute URL of a file on the raw-content host.
pub fn raw_file_url(raw_base: &str, owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!("{}/{}/{}/{}/{}", raw_base, owner, repo, branch, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_file_url() {
        assert_eq!(
            raw_file_url("https://raw.githubusercontent.com", "o", "r", "main", "docs/a.png"),
            "https://raw.githubusercontent.com/o/r/main/docs/a.png"
        );
    }

    #[test]
    fn test_api_request_carries_token() {
        let upstream = UpstreamConfig {
            token: Some("abc".to_string()),
            ..UpstreamConfig::default()
        };
        let client = GitHubClient::new(&upstream).unwrap();

        let request = client.api_get("/repos/o/r").build().unwrap();
        assert_eq!(request.url().as_str(), "https://api.github.com/repos/o/r");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");

        // The token never leaves for the raw host or web pages.
        let raw = client.raw_get("o", "r", "main", "README.md").build().unwrap();
        assert!(raw.headers().get(AUTHORIZATION).is_none());
        let page = client.page_get("o", "r").build().unwrap();
        assert_eq!(page.url().as_str(), "https://github.com/o/r");
        assert!(page.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_anonymous_client() {
        let client = GitHubClient::new(&UpstreamConfig::default()).unwrap();
        let request = client.api_get("/repos/o/r").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }
}
