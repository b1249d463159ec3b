//! Relevance scoring and ranking over published posts.
//!
//! Title and description dominate because they are curated summaries:
//! exact phrase >> keyword >> fuzzy >> content frequency. Body-text
//! frequency is capped per term so long posts cannot win on repetition.

use std::collections::HashSet;

use blogform_client::Post;
use tracing::debug;

use crate::text::{normalize, similarity, terms};

// Phrase-level weights: the full normalized query found as a substring.
const PHRASE_TITLE: f64 = 100.0;
const PHRASE_DESCRIPTION: f64 = 80.0;
const PHRASE_CONTENT: f64 = 40.0;

// Per-term keyword weights. A term that exactly equals a tag or category
// also counts as a substring of it, so both weights apply.
const TERM_TITLE: f64 = 20.0;
const TERM_DESCRIPTION: f64 = 15.0;
const TERM_TAG_EXACT: f64 = 25.0;
const TERM_TAG_PARTIAL: f64 = 15.0;
const TERM_CATEGORY_EXACT: f64 = 25.0;
const TERM_CATEGORY_PARTIAL: f64 = 15.0;

// Content-frequency scoring, capped per term.
const CONTENT_OCCURRENCE: f64 = 2.0;
const CONTENT_OCCURRENCE_CAP: f64 = 10.0;

// Fuzzy word-overlap bonuses, applied above the threshold.
const SIMILARITY_THRESHOLD: f64 = 0.3;
const SIMILARITY_TITLE_WEIGHT: f64 = 30.0;
const SIMILARITY_DESCRIPTION_WEIGHT: f64 = 20.0;

// Bonus per distinct matching term when more than one matched outside the
// content body.
const MULTI_TERM_BONUS: f64 = 10.0;

/// Relevance of one post against a raw query. Zero means "no match".
pub fn score_post(post: &Post, query: &str) -> f64 {
    let normalized = normalize(query);
    let query_terms = terms(&normalized);
    score_prepared(post, &normalized, &query_terms)
}

fn score_prepared(post: &Post, query: &str, query_terms: &[&str]) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let title = normalize(&post.title);
    let description = normalize(&post.meta_description);
    let content = normalize(&post.content);
    let tags: Vec<String> = post.tags.iter().map(|t| normalize(t)).collect();
    let categories: Vec<String> = post.categories.iter().map(|c| normalize(c)).collect();

    let mut score = 0.0;

    if title.contains(query) {
        score += PHRASE_TITLE;
    }
    if description.contains(query) {
        score += PHRASE_DESCRIPTION;
    }
    if content.contains(query) {
        score += PHRASE_CONTENT;
    }

    let mut matched_terms: HashSet<&str> = HashSet::new();
    for &term in query_terms {
        let mut term_matched = false;

        if title.contains(term) {
            score += TERM_TITLE;
            term_matched = true;
        }
        if description.contains(term) {
            score += TERM_DESCRIPTION;
            term_matched = true;
        }
        if tags.iter().any(|t| t == term) {
            score += TERM_TAG_EXACT;
            term_matched = true;
        }
        if tags.iter().any(|t| t.contains(term)) {
            score += TERM_TAG_PARTIAL;
            term_matched = true;
        }
        if categories.iter().any(|c| c == term) {
            score += TERM_CATEGORY_EXACT;
            term_matched = true;
        }
        if categories.iter().any(|c| c.contains(term)) {
            score += TERM_CATEGORY_PARTIAL;
            term_matched = true;
        }

        let occurrences = content.matches(term).count() as f64;
        score += (occurrences * CONTENT_OCCURRENCE).min(CONTENT_OCCURRENCE_CAP);

        // Content-only matches do not count toward the multi-term bonus.
        if term_matched {
            matched_terms.insert(term);
        }
    }

    let title_similarity = similarity(query, &title);
    if title_similarity > SIMILARITY_THRESHOLD {
        score += title_similarity * SIMILARITY_TITLE_WEIGHT;
    }
    let description_similarity = similarity(query, &description);
    if description_similarity > SIMILARITY_THRESHOLD {
        score += description_similarity * SIMILARITY_DESCRIPTION_WEIGHT;
    }

    if matched_terms.len() > 1 {
        score += MULTI_TERM_BONUS * matched_terms.len() as f64;
    }

    score
}

/// Rank a published collection against a free-text query, highest score
/// first. A whitespace-only query returns the collection unranked. Posts
/// scoring zero are dropped; ties order by publish date, newest first.
pub fn rank(posts: Vec<Post>, query: &str) -> Vec<Post> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return posts;
    }
    let query_terms = terms(&normalized);

    let mut scored: Vec<(f64, Post)> = posts
        .into_iter()
        .filter_map(|post| {
            let score = score_prepared(&post, &normalized, &query_terms);
            (score > 0.0).then_some((score, post))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.1.publish_date.cmp(&a.1.publish_date))
    });

    debug!(query = normalized, results = scored.len(), "Ranked search results");
    scored.into_iter().map(|(_, post)| post).collect()
}
