//! Personality traits that shape how the agent replies.

pub mod personality;

pub use personality::{PersonalityState, TraitName};
