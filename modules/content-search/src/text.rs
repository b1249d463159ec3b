//! Text normalization shared by the query and every searched field.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Minimum token length that qualifies for keyword scoring.
pub const MIN_TERM_LEN: usize = 2;

/// Lowercase, replace punctuation with spaces, collapse whitespace, trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Whitespace tokens of a normalized query that qualify for keyword
/// scoring. The full normalized query is still used for phrase scoring.
pub fn terms(normalized_query: &str) -> Vec<&str> {
    normalized_query
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .collect()
}

/// Word-overlap similarity between two normalized strings: the fraction of
/// `a`'s words sharing a substring relation with some word of `b`, over
/// the longer word count. Tolerates typos like a dropped trailing letter.
pub fn similarity(a: &str, b: &str) -> f64 {
    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let overlap = words_a
        .iter()
        .filter(|wa| {
            words_b
                .iter()
                .any(|wb| wa.contains(*wb) || wb.contains(**wa))
        })
        .count();

    overlap as f64 / words_a.len().max(words_b.len()) as f64
}
