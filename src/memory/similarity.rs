//! Similar-interaction lookup by keyword overlap.

use crate::memory::interaction::Interaction;
use crate::memory::storage::Store;
use crate::utilities::errors::StoreError;
use crate::utilities::keywords::extract_keywords;

/// A past interaction and how many keywords it shares with the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarInteraction {
    pub interaction: Interaction,
    pub overlap: usize,
}

/// Find past interactions whose queries share keywords with `query`.
///
/// Only the `window` most recent interactions are scanned. Candidates with
/// no shared keyword are dropped, the rest are sorted by overlap
/// (descending) and cut to `limit`. The sort is stable, so equal overlaps
/// keep the store's newest-first order.
pub fn find_similar_interactions(
    store: &dyn Store,
    query: &str,
    window: usize,
    limit: usize,
) -> Result<Vec<SimilarInteraction>, StoreError> {
    let keywords = extract_keywords(query);
    if keywords.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut scored: Vec<SimilarInteraction> = store
        .list_recent_interactions(window)?
        .into_iter()
        .filter_map(|interaction| {
            let overlap = keywords.overlap(&extract_keywords(&interaction.query));
            (overlap > 0).then_some(SimilarInteraction {
                interaction,
                overlap,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.overlap.cmp(&a.overlap));
    scored.truncate(limit);

    log::debug!(
        "find_similar_interactions: {} keyword(s), {} match(es)",
        keywords.len(),
        scored.len()
    );
    Ok(scored)
}
