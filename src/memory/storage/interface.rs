//! Storage interface consumed by the agent core.

use std::collections::BTreeMap;

use crate::knowledge::KnowledgeEntry;
use crate::memory::interaction::{Feedback, Interaction};
use crate::utilities::errors::StoreError;

/// Durable storage for personality traits, interactions, and knowledge.
///
/// Implementations must keep `upsert_knowledge` atomic: a topic's content
/// and confidence change together or not at all.
pub trait Store: Send {
    /// Stored value of a personality trait, if any.
    fn get_trait(&self, name: &str) -> Result<Option<f64>, StoreError>;

    /// Insert or overwrite a personality trait.
    fn set_trait(&self, name: &str, value: f64) -> Result<(), StoreError>;

    /// Overwrite several traits at once.
    ///
    /// The default writes them one by one; backends with transactions
    /// should override to make the write all-or-nothing.
    fn set_traits(&self, traits: &[(&str, f64)]) -> Result<(), StoreError> {
        for (name, value) in traits {
            self.set_trait(name, *value)?;
        }
        Ok(())
    }

    /// All stored traits.
    fn list_traits(&self) -> Result<BTreeMap<String, f64>, StoreError>;

    /// Persist a chat turn and return its id.
    fn insert_interaction(
        &self,
        query: &str,
        response: &str,
        feedback: Option<Feedback>,
    ) -> Result<i64, StoreError>;

    /// Look up a single interaction.
    fn get_interaction(&self, id: i64) -> Result<Option<Interaction>, StoreError>;

    /// Attach feedback to an existing interaction. Returns false if the
    /// row does not exist.
    fn set_interaction_feedback(&self, id: i64, feedback: Feedback) -> Result<bool, StoreError>;

    /// Up to `limit` interactions, newest first.
    fn list_recent_interactions(&self, limit: usize) -> Result<Vec<Interaction>, StoreError>;

    /// Delete every interaction except the `keep` most recent. Returns the
    /// number of rows removed.
    fn delete_interactions_except_recent(&self, keep: usize) -> Result<usize, StoreError>;

    fn count_interactions(&self) -> Result<usize, StoreError>;

    fn count_interactions_with_feedback(&self, feedback: Feedback) -> Result<usize, StoreError>;

    /// Insert `topic` with confidence 0.5, or append `content` to the
    /// existing entry and raise its confidence by 0.1 (capped at 1.0).
    fn upsert_knowledge(&self, topic: &str, content: &str) -> Result<(), StoreError>;

    /// Upsert several topics.
    ///
    /// The default applies them one by one; backends with transactions
    /// should override to make the batch all-or-nothing.
    fn upsert_knowledge_batch(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        for (topic, content) in entries {
            self.upsert_knowledge(topic, content)?;
        }
        Ok(())
    }

    /// Apply one learning step: upsert `knowledge`, then overwrite `traits`.
    ///
    /// The default makes two separate writes, so a trait failure can leave
    /// the knowledge in place; backends with transactions should override
    /// to commit both or neither.
    fn record_learning(
        &self,
        knowledge: &[(&str, &str)],
        traits: &[(&str, f64)],
    ) -> Result<(), StoreError> {
        if !knowledge.is_empty() {
            self.upsert_knowledge_batch(knowledge)?;
        }
        self.set_traits(traits)
    }

    /// Every knowledge entry, in no particular order.
    fn list_knowledge(&self) -> Result<Vec<KnowledgeEntry>, StoreError>;

    fn count_knowledge(&self) -> Result<usize, StoreError>;
}
