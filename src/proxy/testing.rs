// Test doubles for the proxy.
// A scripted repository source and a proxy wired to it over an in-memory cache and manual clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::cache::{ManualClock, TieredCache};
use crate::config::UpstreamConfig;
use crate::error::{FolioError, Result};
use crate::github::{RateLimit, RepoLookup, RepoSource, Repository};

use super::RepoProxy;

/// Scripted answer for metadata lookups.
#[derive(Debug, Clone)]
pub enum FakeLookup {
    Found(Repository),
    RateLimited,
    Unavailable(u16),
    TransportError,
}

#[derive(Default)]
pub struct FakeSource {
    lookup: Mutex<Option<FakeLookup>>,
    files: Mutex<HashMap<String, String>>,
    page: Mutex<Option<String>>,
    repo_calls: AtomicUsize,
    raw_calls: AtomicUsize,
    page_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_lookup(lookup: FakeLookup) -> Arc<Self> {
        let source = Self::default();
        *source.lookup.lock().unwrap() = Some(lookup);
        Arc::new(source)
    }

    pub fn set_lookup(&self, lookup: FakeLookup) {
        *self.lookup.lock().unwrap() = Some(lookup);
    }

    pub fn set_file(&self, branch: &str, path: &str, contents: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(format!("{}/{}", branch, path), contents.to_string());
    }

    pub fn set_page(&self, html: &str) {
        *self.page.lock().unwrap() = Some(html.to_string());
    }

    pub fn repo_calls(&self) -> usize {
        self.repo_calls.load(Ordering::SeqCst)
    }

    pub fn raw_calls(&self) -> usize {
        self.raw_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepoSource for FakeSource {
    async fn repository(&self, _owner: &str, _repo: &str) -> Result<RepoLookup> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        match self.lookup.lock().unwrap().clone() {
            Some(FakeLookup::Found(repo)) => Ok(RepoLookup::Found(repo)),
            Some(FakeLookup::RateLimited) => Ok(RepoLookup::RateLimited(RateLimit {
                remaining: Some(0),
                ..RateLimit::default()
            })),
            Some(FakeLookup::Unavailable(status)) => Ok(RepoLookup::Unavailable { status }),
            Some(FakeLookup::TransportError) | None => {
                Err(FolioError::Other("connection refused".to_string()))
            }
        }
    }

    async fn raw_file(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(&format!("{}/{}", branch, path))
            .cloned())
    }

    async fn repository_page(&self, _owner: &str, _repo: &str) -> Result<String> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.page
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| FolioError::Other("page unreachable".to_string()))
    }
}

/// A proxy over `source` with a fresh in-memory cache and a manual clock.
pub fn proxy_with(source: Arc<FakeSource>) -> (Arc<ManualClock>, RepoProxy) {
    let clock = Arc::new(ManualClock::default());
    let cache = TieredCache::in_memory(clock.clone());
    let proxy = RepoProxy::new(cache, source, UpstreamConfig::default());
    (clock, proxy)
}
