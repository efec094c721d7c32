//! Post store - fetches the post index and per-post resources over HTTP
//!
//! Site content changes by direct file replacement, so every load re-fetches
//! with no-store request semantics and nothing is cached across calls. All
//! fetch and decode failures are contained here: a bad index means an empty
//! collection, a bad post means that one post is dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinSet;

use crate::config::SiteConfig;
use crate::content::{Newsletter, NewsletterIndex, Post, PostIndex};

/// Errors raised while fetching or decoding a remote resource.
///
/// These never escape the public loaders; they are logged and collapsed
/// into "no data" for the affected resource.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed JSON in {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },
}

/// HTTP-backed post and newsletter store
#[derive(Clone)]
pub struct Store {
    client: reqwest::Client,
    base: String,
    posts_index: String,
    newsletters_index: String,
}

impl Store {
    /// Create a store fetching from the site's data base URL
    pub fn new(config: &SiteConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base: config.data_base().to_string(),
            posts_index: config.posts_index.clone(),
            newsletters_index: config.newsletters_index.clone(),
        })
    }

    /// Resolve a resource path against the data base URL
    fn resource_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, StoreError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// Load all posts named by the post index.
    ///
    /// A failed or malformed index yields an empty collection. Per-post
    /// fetches run concurrently; any single failure drops that post only.
    /// Completion order is irrelevant here, the filter/sort pass imposes the
    /// final order.
    pub async fn load_posts(&self) -> Vec<Post> {
        let index_url = self.resource_url(&self.posts_index);
        let index: PostIndex = match self.fetch_json(&index_url).await {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("could not load post index {}: {}", index_url, e);
                return Vec::new();
            }
        };

        let mut tasks = JoinSet::new();
        for path in index.posts {
            let url = self.resource_url(&path);
            let client = self.client.clone();
            tasks.spawn(async move {
                let result = fetch_post(client, url.clone()).await;
                (url, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => results.push(entry),
                Err(e) => tracing::warn!("post fetch task failed: {}", e),
            }
        }

        merge_results(results)
    }

    /// Load the newsletter records; empty on any failure
    pub async fn load_newsletters(&self) -> Vec<Newsletter> {
        let url = self.resource_url(&self.newsletters_index);
        match self.fetch_json::<NewsletterIndex>(&url).await {
            Ok(index) => index.newsletters,
            Err(e) => {
                tracing::warn!("could not load newsletters {}: {}", url, e);
                Vec::new()
            }
        }
    }
}

async fn fetch_post(client: reqwest::Client, url: String) -> Result<Post, StoreError> {
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(StoreError::Status {
            url,
            status: response.status(),
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json { url, source })
}

/// Fold fetch results into the final collection.
///
/// Failures are dropped with a warning, as are records missing id/title and
/// records whose id duplicates one already kept.
fn merge_results(results: Vec<(String, Result<Post, StoreError>)>) -> Vec<Post> {
    let mut posts = Vec::new();
    let mut seen = HashSet::new();

    for (url, result) in results {
        match result {
            Ok(post) => {
                if !post.is_usable() {
                    tracing::warn!("dropping post {} (missing id or title)", url);
                } else if !seen.insert(post.id.clone()) {
                    tracing::warn!("dropping post {} (duplicate id {})", url, post.id);
                } else {
                    posts.push(post);
                }
            }
            Err(e) => tracing::warn!("dropping post {}: {}", url, e),
        }
    }

    posts
}

/// Load-cycle generation counter.
///
/// A reload can begin before an earlier one finishes; results from the
/// earlier cycle must not overwrite state produced by the newer one.
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
}

impl Generation {
    /// Start a new load cycle, superseding any cycle still in flight
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while the given cycle is still the newest one
    pub fn is_current(&self, token: u64) -> bool {
        self.current.load(Ordering::SeqCst) == token
    }
}

/// In-memory post collection shared by the server.
///
/// The collection is immutable between refreshes; a refresh replaces it
/// wholesale, guarded against stale completions by the generation counter.
pub struct StoreHandle {
    store: Store,
    generation: Generation,
    posts: RwLock<Vec<Post>>,
}

impl StoreHandle {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            generation: Generation::default(),
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Start a load cycle without fetching (commit finishes it)
    pub fn begin(&self) -> u64 {
        self.generation.begin()
    }

    /// Install a loaded collection unless a newer cycle has begun
    pub async fn commit(&self, token: u64, posts: Vec<Post>) -> bool {
        let mut guard = self.posts.write().await;
        if self.generation.is_current(token) {
            *guard = posts;
            true
        } else {
            tracing::debug!("discarding stale post load (generation {})", token);
            false
        }
    }

    /// Fetch a fresh collection and install it unless superseded
    pub async fn refresh(&self) -> bool {
        let token = self.begin();
        let posts = self.store.load_posts().await;
        self.commit(token, posts).await
    }

    /// Snapshot of the current collection
    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }
}
