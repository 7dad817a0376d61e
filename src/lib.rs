//! # Recall
//!
//! A single-process conversational agent that learns from feedback.
//!
//! Queries are answered from two SQLite-backed stores, past interactions
//! and accumulated knowledge, using literal keyword overlap as the only
//! relevance signal. A small personality vector (curiosity, helpfulness,
//! verbosity) shapes each reply and drifts with user feedback.
//!
//! ```rust,no_run
//! use recall_agent::{AgentConfig, Feedback, SelfLearningAgent};
//!
//! let mut agent = SelfLearningAgent::open(AgentConfig::default())?;
//! let reply = agent.chat("How do I tune a database?")?;
//! agent.feedback(reply.interaction_id, Feedback::Positive)?;
//! # Ok::<(), recall_agent::AgentError>(())
//! ```

pub mod agent;
pub mod cli;
pub mod knowledge;
pub mod memory;
pub mod persona;
pub mod utilities;

pub use agent::{AgentStats, ChatReply, SelfLearningAgent};
pub use knowledge::{KnowledgeEntry, KnowledgeMatch};
pub use memory::storage::{SQLiteStore, Store};
pub use memory::{Feedback, Interaction};
pub use persona::PersonalityState;
pub use utilities::config::AgentConfig;
pub use utilities::errors::{AgentError, StoreError};
pub use utilities::keywords::{extract_keywords, KeywordSet};
