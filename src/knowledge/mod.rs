//! Accumulated knowledge and its retrieval.
//!
//! Knowledge entries are keyed by topic and grow through positive feedback.
//! Retrieval scores every topic by keyword overlap with the query and
//! breaks ties by confidence.

pub mod entry;

pub use entry::KnowledgeEntry;

use crate::memory::storage::Store;
use crate::utilities::errors::StoreError;
use crate::utilities::keywords::{extract_keywords, KeywordSet};

/// Maximum number of entries returned by [`retrieve_knowledge`].
pub const MAX_KNOWLEDGE_MATCHES: usize = 3;

/// A knowledge entry relevant to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeMatch {
    pub entry: KnowledgeEntry,
    pub overlap: usize,
}

/// Rank stored knowledge against `keywords`.
///
/// Entries whose topic shares no keyword are dropped; the rest are sorted
/// by `(overlap, confidence)` descending and the top three returned.
pub fn retrieve_knowledge(
    store: &dyn Store,
    keywords: &KeywordSet,
) -> Result<Vec<KnowledgeMatch>, StoreError> {
    if keywords.is_empty() {
        return Ok(Vec::new());
    }

    let mut relevant: Vec<KnowledgeMatch> = store
        .list_knowledge()?
        .into_iter()
        .filter_map(|entry| {
            let overlap = keywords.overlap(&extract_keywords(&entry.topic));
            (overlap > 0).then_some(KnowledgeMatch { entry, overlap })
        })
        .collect();

    relevant.sort_by(|a, b| {
        b.overlap
            .cmp(&a.overlap)
            .then_with(|| b.entry.confidence.total_cmp(&a.entry.confidence))
    });
    relevant.truncate(MAX_KNOWLEDGE_MATCHES);
    Ok(relevant)
}
