//! Degrade policy for terminal fetch failure.
//!
//! The bundled sample set mirrors what the site ships for local development:
//! a small collection of published posts that keeps listings and search
//! rendering when the content API is unreachable.

use std::sync::LazyLock;

use crate::types::Post;

/// What the accessors return when every fetch attempt has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Degrade to an empty collection.
    #[default]
    Empty,
    /// Substitute the bundled sample dataset. Also applies when the API
    /// responds successfully but contains zero published posts.
    Sample,
}

static SAMPLE_POSTS: LazyLock<Vec<Post>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("sample_content.json"))
        .expect("bundled sample content must deserialize")
});

/// The bundled sample collection (all posts in it are published).
pub fn sample_posts() -> Vec<Post> {
    SAMPLE_POSTS.clone()
}
