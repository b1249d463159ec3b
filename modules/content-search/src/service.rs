use blogform_client::{ContentClient, Post};
use serde::Serialize;
use tracing::warn;

use crate::score::rank;

/// Ranked results plus the degraded-fetch signal, so callers can tell
/// "no matches" from "API unreachable".
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub posts: Vec<Post>,
    pub error: Option<String>,
}

impl SearchResults {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch-then-rank facade over a [`ContentClient`]. Each call performs its
/// own fetch; there is no cache and no in-flight coalescing.
pub struct SearchService {
    client: ContentClient,
}

impl SearchService {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    /// Fetch the published collection and rank it against `query`. An
    /// empty query returns the whole collection unranked. Terminal fetch
    /// failure degrades to the client's fallback collection with `error`
    /// populated; it never panics and never returns an `Err`.
    pub async fn search_posts(&self, query: &str) -> SearchResults {
        match self.client.fetch_published().await {
            Ok(posts) => {
                let posts = if posts.is_empty() {
                    self.client.fallback_content()
                } else {
                    posts
                };
                SearchResults {
                    posts: rank(posts, query),
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "Search degraded to fallback content");
                SearchResults {
                    posts: rank(self.client.fallback_content(), query),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
