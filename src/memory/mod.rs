//! Interaction memory: storage backends, similarity lookup, and pruning.

pub mod interaction;
pub mod maintenance;
pub mod similarity;
pub mod storage;

pub use interaction::{Feedback, Interaction};
pub use similarity::{find_similar_interactions, SimilarInteraction};
