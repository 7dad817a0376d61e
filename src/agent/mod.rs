//! The self-learning agent: chat orchestration, feedback, and maintenance.
//!
//! ```text
//! query ─▶ keywords ─▶ similar interactions + knowledge ─▶ compose_response ─▶ reply
//!                                                                  │
//!                                        store interaction ◀───────┘
//! reply id + feedback ─▶ learn_from_feedback ─▶ personality + knowledge
//! ```

pub mod learning;
pub mod random;
pub mod response;

pub use learning::LearningRates;
pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use response::{compose_response, FALLBACK_RESPONSE, FOLLOW_UP_TEMPLATES};

use serde::Serialize;

use crate::knowledge::retrieve_knowledge;
use crate::memory::interaction::Feedback;
use crate::memory::maintenance::prune_interactions;
use crate::memory::similarity::find_similar_interactions;
use crate::memory::storage::{SQLiteStore, Store};
use crate::persona::{PersonalityState, TraitName};
use crate::utilities::config::AgentConfig;
use crate::utilities::errors::{AgentError, StoreError};
use crate::utilities::keywords::extract_keywords;

/// The reply to one chat turn and the id of its stored interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub interaction_id: i64,
    pub response: String,
}

/// Learning statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStats {
    pub total_interactions: usize,
    pub knowledge_items: usize,
    pub positive_feedback: usize,
    pub personality: PersonalityState,
}

/// Log a store failure where it happened and hand it back.
fn logged(context: &'static str) -> impl Fn(StoreError) -> StoreError {
    move |e| {
        log::error!("{} failed: {}", context, e);
        e
    }
}

/// Conversational agent backed by a [`Store`].
///
/// Owns its personality; every learning step replaces it with the value
/// returned by [`learning::learn_from_feedback`] once the store has
/// accepted the write.
pub struct SelfLearningAgent {
    config: AgentConfig,
    store: Box<dyn Store>,
    personality: PersonalityState,
    rng: Box<dyn RandomSource>,
}

impl SelfLearningAgent {
    /// Build an agent over `store`, loading (or seeding) its personality.
    pub fn new(
        config: AgentConfig,
        store: Box<dyn Store>,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let personality = load_personality(store.as_ref(), &config)?;
        log::debug!("Loaded personality: {:?}", personality);
        Ok(Self {
            config,
            store,
            personality,
            rng,
        })
    }

    /// Open the SQLite database named in `config` with an entropy-seeded RNG.
    pub fn open(config: AgentConfig) -> Result<Self, AgentError> {
        let store = SQLiteStore::open(&config.database_file).map_err(logged("Opening database"))?;
        Self::new(config, Box::new(store), Box::new(RngSource::from_entropy()))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn personality(&self) -> &PersonalityState {
        &self.personality
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    fn rates(&self) -> LearningRates {
        LearningRates {
            learning_rate: self.config.learning_rate,
            min_trait: self.config.min_trait,
        }
    }

    /// Produce a reply for `query` without storing anything.
    pub fn generate_response(&mut self, query: &str) -> Result<String, AgentError> {
        let similar = find_similar_interactions(
            self.store.as_ref(),
            query,
            self.config.similarity_window,
            self.config.similar_limit,
        )
        .map_err(logged("Similarity search"))?;
        let knowledge = retrieve_knowledge(self.store.as_ref(), &extract_keywords(query))
            .map_err(logged("Knowledge retrieval"))?;

        Ok(compose_response(
            &knowledge,
            &similar,
            &self.personality,
            self.rng.as_mut(),
        ))
    }

    /// Answer `query`, store the turn, and occasionally prune history.
    pub fn chat(&mut self, query: &str) -> Result<ChatReply, AgentError> {
        let response = self.generate_response(query)?;
        let interaction_id = self
            .store
            .insert_interaction(query, &response, None)
            .map_err(logged("Storing interaction"))?;

        if self.rng.next_f64() < self.config.prune_probability {
            self.prune()?;
        }

        Ok(ChatReply {
            interaction_id,
            response,
        })
    }

    /// Record feedback on a stored interaction and learn from it.
    pub fn feedback(&mut self, interaction_id: i64, feedback: Feedback) -> Result<(), AgentError> {
        let interaction = self
            .store
            .get_interaction(interaction_id)
            .map_err(logged("Loading interaction"))?
            .ok_or(AgentError::InteractionNotFound(interaction_id))?;

        if !self
            .store
            .set_interaction_feedback(interaction_id, feedback)
            .map_err(logged("Recording feedback"))?
        {
            return Err(AgentError::InteractionNotFound(interaction_id));
        }

        self.learn_from_feedback(&interaction.query, &interaction.response, feedback)
    }

    /// Adjust personality and knowledge from a `(query, response)` pair.
    ///
    /// Does not touch stored interactions; use [`feedback`](Self::feedback)
    /// to also mark the originating row.
    pub fn learn_from_feedback(
        &mut self,
        query: &str,
        response: &str,
        feedback: Feedback,
    ) -> Result<(), AgentError> {
        let next = learning::learn_from_feedback(
            self.store.as_ref(),
            self.personality,
            query,
            response,
            feedback,
            self.rates(),
        )
        .map_err(logged("Learning from feedback"))?;
        self.personality = next;
        Ok(())
    }

    /// Like [`learn_from_feedback`](Self::learn_from_feedback) but takes the
    /// signal as text. Anything other than `positive`/`negative` is
    /// rejected before any state changes.
    pub fn learn_from_signal(
        &mut self,
        query: &str,
        response: &str,
        signal: &str,
    ) -> Result<(), AgentError> {
        let feedback = signal.parse::<Feedback>().map_err(|e| {
            log::warn!("Rejected feedback signal {:?}", signal);
            e
        })?;
        self.learn_from_feedback(query, response, feedback)
    }

    /// Trim interaction history to the retention ceiling.
    pub fn prune(&self) -> Result<usize, AgentError> {
        Ok(prune_interactions(self.store.as_ref(), self.config.max_memory_items)
            .map_err(logged("Pruning interactions"))?)
    }

    pub fn stats(&self) -> Result<AgentStats, AgentError> {
        let store = self.store.as_ref();
        Ok(AgentStats {
            total_interactions: store.count_interactions().map_err(logged("Counting interactions"))?,
            knowledge_items: store.count_knowledge().map_err(logged("Counting knowledge"))?,
            positive_feedback: store
                .count_interactions_with_feedback(Feedback::Positive)
                .map_err(logged("Counting feedback"))?,
            personality: self.personality,
        })
    }
}

/// Stored traits win; missing ones are seeded from `config` and written back.
fn load_personality(store: &dyn Store, config: &AgentConfig) -> Result<PersonalityState, StoreError> {
    let mut personality = PersonalityState::from(config.personality);
    for name in TraitName::ALL {
        match store.get_trait(name.as_str()).map_err(logged("Loading personality"))? {
            Some(value) => personality.set(name, value),
            None => store
                .set_trait(name.as_str(), personality.get(name))
                .map_err(logged("Seeding personality"))?,
        }
    }
    Ok(personality.floored(config.min_trait))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_with(draws: Vec<f64>) -> SelfLearningAgent {
        let store = SQLiteStore::open_in_memory().unwrap();
        SelfLearningAgent::new(
            AgentConfig::default(),
            Box::new(store),
            Box::new(ScriptedRandom::new(draws)),
        )
        .unwrap()
    }

    #[test]
    fn test_new_seeds_personality_into_store() {
        let agent = agent_with(vec![0.99]);
        let traits = agent.store().list_traits().unwrap();
        assert_eq!(traits["curiosity"], 0.7);
        assert_eq!(traits["helpfulness"], 0.8);
        assert_eq!(traits["verbosity"], 0.6);
    }

    #[test]
    fn test_new_prefers_stored_traits() {
        let store = SQLiteStore::open_in_memory().unwrap();
        store.set_trait("curiosity", 0.35).unwrap();
        let agent = SelfLearningAgent::new(
            AgentConfig::default(),
            Box::new(store),
            Box::new(ScriptedRandom::constant(0.99)),
        )
        .unwrap();
        assert_eq!(agent.personality().curiosity, 0.35);
        assert_eq!(agent.personality().verbosity, 0.6);
    }

    #[test]
    fn test_stored_trait_below_floor_is_lifted() {
        let store = SQLiteStore::open_in_memory().unwrap();
        store.set_trait("curiosity", 0.1).unwrap();
        let mut agent = SelfLearningAgent::new(
            AgentConfig::default(),
            Box::new(store),
            Box::new(ScriptedRandom::constant(0.99)),
        )
        .unwrap();
        assert_eq!(agent.personality().curiosity, 0.3);

        agent
            .learn_from_feedback("anything", "really?", Feedback::Positive)
            .unwrap();
        assert!((agent.personality().curiosity - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_config_personality_below_floor_rejected() {
        let mut config = AgentConfig::default();
        config.personality.curiosity = 0.1;
        let result = SelfLearningAgent::new(
            config,
            Box::new(SQLiteStore::open_in_memory().unwrap()),
            Box::new(ScriptedRandom::constant(0.99)),
        );
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = AgentConfig::default();
        config.learning_rate = -1.0;
        let result = SelfLearningAgent::new(
            config,
            Box::new(SQLiteStore::open_in_memory().unwrap()),
            Box::new(ScriptedRandom::constant(0.5)),
        );
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_chat_stores_interaction_without_feedback() {
        let mut agent = agent_with(vec![0.99]);
        let reply = agent.chat("What is caching?").unwrap();
        assert_eq!(reply.response, FALLBACK_RESPONSE);

        let stored = agent.store().get_interaction(reply.interaction_id).unwrap().unwrap();
        assert_eq!(stored.query, "What is caching?");
        assert_eq!(stored.response, reply.response);
        assert_eq!(stored.feedback, None);
    }

    #[test]
    fn test_chat_prunes_when_draw_below_probability() {
        let mut config = AgentConfig::default();
        config.max_memory_items = 2;
        let mut agent = SelfLearningAgent::new(
            config,
            Box::new(SQLiteStore::open_in_memory().unwrap()),
            // gate draw fails (0.99), prune draw fails (0.99) ...
            Box::new(ScriptedRandom::new(vec![0.99, 0.99, 0.99, 0.99, 0.99, 0.99, 0.99, 0.05])),
        )
        .unwrap();

        for i in 0..3 {
            agent.chat(&format!("question {i}")).unwrap();
        }
        assert_eq!(agent.store().count_interactions().unwrap(), 3);

        // ... until the eighth draw, which is this turn's prune draw.
        agent.chat("question 3").unwrap();
        assert_eq!(agent.store().count_interactions().unwrap(), 2);
    }

    #[test]
    fn test_feedback_marks_row_and_learns() {
        let mut agent = agent_with(vec![0.99]);
        let reply = agent.chat("What is caching?").unwrap();
        agent.feedback(reply.interaction_id, Feedback::Positive).unwrap();

        let stored = agent.store().get_interaction(reply.interaction_id).unwrap().unwrap();
        assert_eq!(stored.feedback, Some(Feedback::Positive));
        assert_eq!(agent.stats().unwrap().positive_feedback, 1);
        assert_eq!(agent.stats().unwrap().knowledge_items, 1);
    }

    #[test]
    fn test_feedback_for_missing_interaction() {
        let mut agent = agent_with(vec![0.99]);
        let err = agent.feedback(999, Feedback::Negative).unwrap_err();
        assert!(matches!(err, AgentError::InteractionNotFound(999)));
        assert_eq!(agent.personality(), &PersonalityState::default());
    }

    #[test]
    fn test_unknown_signal_rejected_without_mutation() {
        let mut agent = agent_with(vec![0.99]);
        let before = *agent.personality();
        let err = agent
            .learn_from_signal("database question", "Any thoughts?", "meh")
            .unwrap_err();
        assert!(matches!(err, AgentError::UnknownFeedback(_)));
        assert_eq!(agent.personality(), &before);
        assert_eq!(agent.store().count_knowledge().unwrap(), 0);

        agent
            .learn_from_signal("database question", "Any thoughts?", "positive")
            .unwrap();
        assert!(agent.personality().curiosity > before.curiosity);
    }

    #[test]
    fn test_stats_reflect_store() {
        let mut agent = agent_with(vec![0.99]);
        agent.chat("tell me about tokio").unwrap();
        agent.chat("tell me about rayon").unwrap();
        let stats = agent.stats().unwrap();
        assert_eq!(stats.total_interactions, 2);
        assert_eq!(stats.knowledge_items, 0);
        assert_eq!(stats.positive_feedback, 0);
        assert_eq!(stats.personality, PersonalityState::default());
    }
}
