//! A learned topic and the content accumulated for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confidence assigned to a topic the first time it is learned.
pub const INITIAL_CONFIDENCE: f64 = 0.5;

/// Confidence added each time an existing topic is reinforced.
pub const CONFIDENCE_STEP: f64 = 0.1;

/// Separator placed between appended content fragments.
pub const CONTENT_SEPARATOR: &str = " | ";

/// One row of the knowledge table. `topic` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: String,
    pub content: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl KnowledgeEntry {
    /// A freshly learned topic.
    pub fn new(topic: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            topic: topic.into(),
            content: content.into(),
            confidence: INITIAL_CONFIDENCE,
            timestamp: now,
        }
    }
}
