pub mod error;
pub mod fallback;
pub mod retry;
pub mod types;

pub use error::{ContentError, Result};
pub use fallback::FallbackPolicy;
pub use retry::RetryPolicy;
pub use types::{Post, PostStatus};

use std::time::Duration;

use tracing::{info, warn};

/// Public content endpoint; overridable via `CONTENT_API_URL`.
const DEFAULT_API_URL: &str = "https://blogform.netlify.app/api/content.json";

/// Per-attempt request timeout. A timed-out attempt is retried like any
/// other failure.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ContentClient {
    client: reqwest::Client,
    endpoint: String,
    retry: RetryPolicy,
    fallback: FallbackPolicy,
}

impl ContentClient {
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.to_string(),
            retry: RetryPolicy::default(),
            fallback: FallbackPolicy::default(),
        }
    }

    /// Endpoint from the `CONTENT_API_URL` environment variable, falling
    /// back to the public content API.
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("CONTENT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&endpoint)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// One GET against the content endpoint. Non-2xx is an error. The body
    /// is deserialized element by element so a single malformed record
    /// cannot poison the whole collection.
    async fn fetch_once(&self) -> Result<Vec<Post>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header("Cache-Control", "no-cache")
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ContentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: Vec<serde_json::Value> = resp.json().await?;
        Ok(parse_collection(raw))
    }

    /// Fetch the full collection with retries and filter to published
    /// posts, preserving source order. Terminal failure propagates; the
    /// degrade policy is applied by the accessors, not here.
    pub async fn fetch_published(&self) -> Result<Vec<Post>> {
        let posts = retry::fetch_with_retry(&self.retry, |_| self.fetch_once()).await?;
        let published: Vec<Post> = posts.into_iter().filter(Post::is_published).collect();
        info!(count = published.len(), "Fetched published posts");
        Ok(published)
    }

    /// The collection the configured fallback policy degrades to.
    pub fn fallback_content(&self) -> Vec<Post> {
        match self.fallback {
            FallbackPolicy::Empty => Vec::new(),
            FallbackPolicy::Sample => fallback::sample_posts(),
        }
    }

    /// All published posts. Terminal fetch failure degrades per the
    /// fallback policy instead of surfacing an error.
    pub async fn all_content(&self) -> Vec<Post> {
        match self.fetch_published().await {
            Ok(posts) => {
                if posts.is_empty() && self.fallback == FallbackPolicy::Sample {
                    warn!("No published posts in API response, using sample content");
                    return fallback::sample_posts();
                }
                posts
            }
            Err(err) => {
                warn!(error = %err, "Content fetch failed, applying fallback policy");
                self.fallback_content()
            }
        }
    }

    /// First published post with an exact slug match. Not-found is a
    /// normal outcome, distinct from fetch failure (which also lands here
    /// as `None` once the fallback collection has been consulted).
    pub async fn content_by_slug(&self, slug: &str) -> Option<Post> {
        self.all_content().await.into_iter().find(|p| p.slug == slug)
    }

    /// Published posts whose `categories` contains an exact,
    /// case-sensitive match.
    pub async fn posts_by_category(&self, category: &str) -> Vec<Post> {
        self.all_content()
            .await
            .into_iter()
            .filter(|p| p.categories.iter().any(|c| c == category))
            .collect()
    }
}

/// Deserialize each element independently, quarantining malformed records
/// instead of failing the collection.
fn parse_collection(raw: Vec<serde_json::Value>) -> Vec<Post> {
    let total = raw.len();
    let posts: Vec<Post> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Post>(value) {
            Ok(post) => Some(post),
            Err(err) => {
                warn!(error = %err, "Quarantined malformed post record");
                None
            }
        })
        .collect();

    if posts.len() < total {
        warn!(kept = posts.len(), total, "Dropped malformed records from collection");
    }
    posts
}
