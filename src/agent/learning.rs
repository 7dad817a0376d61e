//! Feedback-driven learning.
//!
//! Positive feedback reinforces the traits the reply exhibited (asking a
//! question, being long) and records the reply as knowledge under the
//! query's first keywords. Negative feedback dampens curiosity and
//! verbosity down to a floor. Either way the whole personality vector is
//! written back.

use crate::memory::interaction::Feedback;
use crate::memory::storage::Store;
use crate::persona::{PersonalityState, TraitName};
use crate::utilities::errors::StoreError;
use crate::utilities::keywords::extract_keywords;
use crate::utilities::string_utils::{truncate_chars, word_count};

/// Number of query keywords that become knowledge topics.
pub const MAX_LEARNED_TOPICS: usize = 3;

/// Characters of the reply stored as knowledge content.
pub const LEARNED_CONTENT_CHARS: usize = 300;

/// Replies longer than this many words reinforce verbosity.
pub const VERBOSE_WORD_THRESHOLD: usize = 50;

/// Step sizes for trait updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningRates {
    pub learning_rate: f64,
    /// Lowest value negative feedback can push a trait to.
    pub min_trait: f64,
}

/// Personality after `feedback` on `response`. Pure.
///
/// Every trait of the result lies in `[rates.min_trait, 1.0]`.
pub fn adjust_personality(
    personality: PersonalityState,
    response: &str,
    feedback: Feedback,
    rates: LearningRates,
) -> PersonalityState {
    let mut next = personality;
    match feedback {
        Feedback::Positive => {
            if response.contains('?') {
                next.increase(TraitName::Curiosity, rates.learning_rate);
            }
            if word_count(response) > VERBOSE_WORD_THRESHOLD {
                next.increase(TraitName::Verbosity, rates.learning_rate);
            }
        }
        Feedback::Negative => {
            next.decrease(TraitName::Curiosity, rates.learning_rate, rates.min_trait);
            next.decrease(TraitName::Verbosity, rates.learning_rate, rates.min_trait);
        }
    }
    next.floored(rates.min_trait)
}

/// Learn from one `(query, response, feedback)` triple.
///
/// Knowledge upserts and the personality overwrite reach the store in one
/// [`Store::record_learning`] call; with [`SQLiteStore`] they commit together.
/// A failed write returns the error and leaves the caller's personality
/// valid. On success the new personality is returned for the caller to
/// adopt.
///
/// [`SQLiteStore`]: crate::memory::storage::SQLiteStore
pub fn learn_from_feedback(
    store: &dyn Store,
    personality: PersonalityState,
    query: &str,
    response: &str,
    feedback: Feedback,
    rates: LearningRates,
) -> Result<PersonalityState, StoreError> {
    let next = adjust_personality(personality, response, feedback, rates);

    let keywords = extract_keywords(query);
    let content = truncate_chars(response, LEARNED_CONTENT_CHARS);
    let entries: Vec<(&str, &str)> = match feedback {
        Feedback::Positive => keywords
            .iter()
            .take(MAX_LEARNED_TOPICS)
            .map(|topic| (topic, content))
            .collect(),
        Feedback::Negative => Vec::new(),
    };

    store.record_learning(&entries, &next.to_pairs())?;
    if !entries.is_empty() {
        log::info!("Learned {} topic(s) from positive feedback", entries.len());
    }
    log::debug!(
        "Personality after {} feedback: curiosity={:.2} verbosity={:.2}",
        feedback,
        next.curiosity,
        next.verbosity
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::storage::SQLiteStore;

    const RATES: LearningRates = LearningRates {
        learning_rate: 0.05,
        min_trait: 0.3,
    };

    #[test]
    fn test_positive_with_question_raises_curiosity() {
        let p = adjust_personality(
            PersonalityState::default(),
            "Want more?",
            Feedback::Positive,
            RATES,
        );
        assert!((p.curiosity - 0.75).abs() < 1e-9);
        assert_eq!(p.verbosity, 0.6);
    }

    #[test]
    fn test_positive_long_reply_raises_verbosity() {
        let long = "word ".repeat(51);
        let p = adjust_personality(PersonalityState::default(), &long, Feedback::Positive, RATES);
        assert_eq!(p.curiosity, 0.7);
        assert!((p.verbosity - 0.65).abs() < 1e-9);

        let exactly_fifty = "word ".repeat(50);
        let p = adjust_personality(
            PersonalityState::default(),
            &exactly_fifty,
            Feedback::Positive,
            RATES,
        );
        assert_eq!(p.verbosity, 0.6);
    }

    #[test]
    fn test_negative_lowers_to_floor() {
        let mut p = PersonalityState::default();
        for _ in 0..10 {
            p = adjust_personality(p, "anything", Feedback::Negative, RATES);
        }
        assert_eq!(p.curiosity, 0.3);
        assert_eq!(p.verbosity, 0.3);
        assert_eq!(p.helpfulness, 0.8);
    }

    #[test]
    fn test_traits_stay_in_bounds_under_mixed_feedback() {
        let mut p = PersonalityState::default();
        let long_question = format!("{} ok?", "word ".repeat(60));
        for i in 0..200 {
            let feedback = if i % 3 == 0 {
                Feedback::Negative
            } else {
                Feedback::Positive
            };
            p = adjust_personality(p, &long_question, feedback, RATES);
            for (_, value) in p.iter() {
                assert!((0.3..=1.0).contains(&value), "trait out of bounds: {value}");
            }
        }
    }

    #[test]
    fn test_positive_feedback_lifts_trait_below_floor() {
        let low = PersonalityState {
            curiosity: 0.1,
            ..PersonalityState::default()
        };
        let p = adjust_personality(low, "really?", Feedback::Positive, RATES);
        assert_eq!(p.curiosity, 0.3);
    }

    #[test]
    fn test_positive_feedback_learns_first_three_keywords() {
        let store = SQLiteStore::open_in_memory().unwrap();
        let response = "r".repeat(400);
        learn_from_feedback(
            &store,
            PersonalityState::default(),
            "alpha bravo charlie delta echo",
            &response,
            Feedback::Positive,
            RATES,
        )
        .unwrap();

        let topics: Vec<String> = store.list_knowledge().unwrap().into_iter().map(|e| e.topic).collect();
        assert_eq!(topics, vec!["alpha", "bravo", "charlie"]);
        let entry = &store.list_knowledge().unwrap()[0];
        assert_eq!(entry.content.chars().count(), 300);
        assert_eq!(entry.confidence, 0.5);
    }

    #[test]
    fn test_negative_feedback_learns_no_knowledge_and_persists_traits() {
        let store = SQLiteStore::open_in_memory().unwrap();
        let next = learn_from_feedback(
            &store,
            PersonalityState::default(),
            "database indexing",
            "reply",
            Feedback::Negative,
            RATES,
        )
        .unwrap();

        assert_eq!(store.count_knowledge().unwrap(), 0);
        let traits = store.list_traits().unwrap();
        assert_eq!(traits.len(), 3);
        assert_eq!(traits["curiosity"], next.curiosity);
        assert_eq!(traits["verbosity"], next.verbosity);
        assert_eq!(traits["helpfulness"], 0.8);
    }
}
