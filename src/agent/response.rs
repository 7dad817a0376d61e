//! Reply composition.
//!
//! A reply is built from up to three parts, in order: known facts about the
//! query's keywords, a note on similar past questions (quoting the best
//! match when it was well received), and a curiosity-driven follow-up
//! question. An empty result
//! falls back to a fixed "still learning" message.

use crate::agent::random::RandomSource;
use crate::knowledge::KnowledgeMatch;
use crate::memory::interaction::Feedback;
use crate::memory::similarity::SimilarInteraction;
use crate::persona::PersonalityState;
use crate::utilities::string_utils::truncate_chars;

/// Reply used when nothing else applies.
pub const FALLBACK_RESPONSE: &str = "I don't have specific information about this yet, but I'm learning! \
Could you provide more details or context?";

/// Follow-up questions offered when curiosity is high.
pub const FOLLOW_UP_TEMPLATES: [&str; 4] = [
    "Would you like me to elaborate on any aspect?",
    "Is there a specific part you'd like to explore more?",
    "Can you tell me more about your specific use case?",
    "What aspect of this interests you most?",
];

const KNOWLEDGE_INTRO: &str = "Based on what I know:";
const RECALL_INTRO: &str = "\nI recall similar questions:";
const MAX_KNOWLEDGE_LINES: usize = 2;
const KNOWLEDGE_CHAR_BUDGET: usize = 200;
const RECALL_CHAR_BUDGET: usize = 150;

/// Curiosity above which a similar past answer may be recalled.
const RECALL_CURIOSITY: f64 = 0.5;
/// Curiosity above which a follow-up question may be asked.
const FOLLOW_UP_CURIOSITY: f64 = 0.6;
/// Curiosity at or above which two follow-ups are sampled.
const DOUBLE_FOLLOW_UP_CURIOSITY: f64 = 0.7;

/// Sample follow-up questions: one when curiosity is below 0.7, else two.
pub fn follow_up_questions(
    personality: &PersonalityState,
    rng: &mut dyn RandomSource,
) -> Vec<&'static str> {
    let amount = if personality.curiosity < DOUBLE_FOLLOW_UP_CURIOSITY {
        1
    } else {
        2
    };
    rng.sample_indices(FOLLOW_UP_TEMPLATES.len(), amount)
        .into_iter()
        .map(|i| FOLLOW_UP_TEMPLATES[i])
        .collect()
}

/// Compose a reply from retrieval results and the current personality.
///
/// `knowledge` and `similar` are expected in ranked order. The only side
/// effect is consuming draws from `rng`: one gate draw when curiosity
/// exceeds 0.6, plus the follow-up sample when the gate opens.
pub fn compose_response(
    knowledge: &[KnowledgeMatch],
    similar: &[SimilarInteraction],
    personality: &PersonalityState,
    rng: &mut dyn RandomSource,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !knowledge.is_empty() {
        parts.push(KNOWLEDGE_INTRO.to_string());
        for m in knowledge.iter().take(MAX_KNOWLEDGE_LINES) {
            parts.push(format!(
                "- {}: {}",
                m.entry.topic,
                truncate_chars(&m.entry.content, KNOWLEDGE_CHAR_BUDGET)
            ));
        }
    }

    if personality.curiosity > RECALL_CURIOSITY {
        if let Some(best) = similar.first() {
            parts.push(RECALL_INTRO.to_string());
            if best.interaction.feedback == Some(Feedback::Positive) {
                parts.push(format!(
                    "Previously: {}",
                    truncate_chars(&best.interaction.response, RECALL_CHAR_BUDGET)
                ));
            }
        }
    }

    if personality.curiosity > FOLLOW_UP_CURIOSITY && rng.next_f64() < personality.curiosity {
        if let Some(question) = follow_up_questions(personality, rng).first() {
            parts.push(format!("\n{question}"));
        }
    }

    if parts.is_empty() {
        return FALLBACK_RESPONSE.to_string();
    }
    parts.join("\n")
}
