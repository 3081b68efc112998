// GitHub upstream module.
// Provides the HTTP client, response types, and the `RepoSource` capability the proxy consumes.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GitHubClient, raw_file_url};
pub use endpoints::{
    RepoSource, classify_failure, classify_response, is_rate_limited, raw_file_contents,
};
pub use types::*;
