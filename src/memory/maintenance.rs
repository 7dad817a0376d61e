//! Bounding the interaction history.

use crate::memory::storage::Store;
use crate::utilities::errors::StoreError;

/// Delete all but the `max_items` most recent interactions.
///
/// Idempotent; a table already within bounds is left untouched. Returns the
/// number of rows removed.
pub fn prune_interactions(store: &dyn Store, max_items: usize) -> Result<usize, StoreError> {
    let removed = store.delete_interactions_except_recent(max_items)?;
    if removed > 0 {
        log::info!(
            "Pruned {} interaction(s), keeping the {} most recent",
            removed,
            max_items
        );
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::storage::SQLiteStore;

    #[test]
    fn test_prune_leaves_min_of_ceiling_and_count() {
        let store = SQLiteStore::open_in_memory().unwrap();
        for i in 0..7 {
            store.insert_interaction(&format!("q{i}"), "r", None).unwrap();
        }

        assert_eq!(prune_interactions(&store, 10).unwrap(), 0);
        assert_eq!(store.count_interactions().unwrap(), 7);

        assert_eq!(prune_interactions(&store, 3).unwrap(), 4);
        assert_eq!(store.count_interactions().unwrap(), 3);
        let newest = store.list_recent_interactions(1).unwrap();
        assert_eq!(newest[0].query, "q6");

        // Running again changes nothing.
        assert_eq!(prune_interactions(&store, 3).unwrap(), 0);
        assert_eq!(store.count_interactions().unwrap(), 3);
    }

    #[test]
    fn test_prune_to_zero() {
        let store = SQLiteStore::open_in_memory().unwrap();
        store.insert_interaction("q", "r", None).unwrap();
        assert_eq!(prune_interactions(&store, 0).unwrap(), 1);
        assert_eq!(store.count_interactions().unwrap(), 0);
    }
}
