//! Keyword extraction and keyword-overlap scoring.
//!
//! Text is lowercased, split on whitespace, stripped of surrounding
//! punctuation, and filtered against a fixed stop-word list. Only tokens
//! longer than three characters survive. The result is a deduplicated
//! [`KeywordSet`] that keeps first-occurrence order so that "the first N
//! keywords" of a query is well defined.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Minimum token length (exclusive) for a token to count as a keyword.
pub const MIN_KEYWORD_LEN: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can",
        "of", "at", "by", "for", "with", "about", "against", "between", "into", "through",
        "during", "before", "after", "above", "below", "to", "from", "up", "down", "in", "out",
        "on", "off", "over", "under", "again", "further", "then", "once", "here", "there",
        "when", "where", "why", "how", "all", "both", "each", "few", "more", "most", "other",
        "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
        "what",
    ]
    .into_iter()
    .collect()
});

/// Returns true if `word` (already lowercased) is on the stop-word list.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// A deduplicated set of significant lowercase tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Keywords in order of first appearance in the source text.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Count of keywords present in both sets.
    pub fn overlap(&self, other: &KeywordSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let lookup: HashSet<&str> = large.iter().collect();
        small.iter().filter(|w| lookup.contains(w)).count()
    }
}

/// Extract the significant words of `text`.
///
/// Empty or whitespace-only input yields an empty set.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for raw in text.split_whitespace() {
        let token = raw
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if token.chars().count() <= MIN_KEYWORD_LEN || is_stop_word(&token) {
            continue;
        }
        if seen.insert(token.clone()) {
            words.push(token);
        }
    }

    KeywordSet { words }
}
