// Runtime configuration.
// Loaded from environment variables (optionally via a .env file) with defaults for every value.

use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
const DEFAULT_WEB_BASE: &str = "https://github.com";
const DEFAULT_PREVIEW_BASE: &str = "https://opengraph.githubassets.com/1";

/// Base URLs of the upstream GitHub surfaces the proxy talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Repository metadata JSON API.
    pub api_base: String,
    /// Raw file content host.
    pub raw_base: String,
    /// Rendered repository pages (scrape fallback).
    pub web_base: String,
    /// Social preview image host.
    pub preview_base: String,
    /// Optional bearer token for the metadata API.
    pub token: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            preview_base: DEFAULT_PREVIEW_BASE.to_string(),
            token: None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Connection string for the external key-value cache tier
    pub redis_url: Option<String>,
    /// Upstream endpoints
    pub upstream: UpstreamConfig,
    /// Repository URLs shown by the desk
    pub desk_repos: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT"))?,
            None => DEFAULT_PORT,
        };

        let upstream = UpstreamConfig {
            api_base: base_url(non_empty("GITHUB_API_BASE"), DEFAULT_API_BASE),
            raw_base: base_url(non_empty("GITHUB_RAW_BASE"), DEFAULT_RAW_BASE),
            web_base: base_url(non_empty("GITHUB_WEB_BASE"), DEFAULT_WEB_BASE),
            preview_base: base_url(non_empty("GITHUB_PREVIEW_BASE"), DEFAULT_PREVIEW_BASE),
            token: non_empty("GITHUB_TOKEN"),
        };

        for (name, value) in [
            ("GITHUB_API_BASE", &upstream.api_base),
            ("GITHUB_RAW_BASE", &upstream.raw_base),
            ("GITHUB_WEB_BASE", &upstream.web_base),
            ("GITHUB_PREVIEW_BASE", &upstream.preview_base),
        ] {
            url::Url::parse(value).map_err(|_| ConfigError::InvalidValue(name))?;
        }

        let desk_repos = non_empty("FOLIO_DESK_REPOS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            redis_url: non_empty("REDIS_URL"),
            upstream,
            desk_repos,
        })
    }

    /// Socket address string for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.redis_url.is_none());
        assert_eq!(config.upstream, UpstreamConfig::default());
        assert!(config.desk_repos.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("GITHUB_API_BASE", "http://localhost:9000/"),
            ("GITHUB_TOKEN", "secret"),
            ("FOLIO_DESK_REPOS", "https://github.com/a/b, ,https://github.com/c/d"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.upstream.api_base, "http://localhost:9000");
        assert_eq!(config.upstream.token.as_deref(), Some("secret"));
        assert_eq!(
            config.desk_repos,
            vec!["https://github.com/a/b", "https://github.com/c/d"]
        );
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = Config::from_lookup(lookup(&[("REDIS_URL", "  "), ("HOST", "")])).unwrap();
        assert!(config.redis_url.is_none());
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PORT")));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Config::from_lookup(lookup(&[("GITHUB_RAW_BASE", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("GITHUB_RAW_BASE")));
    }
}
