//! The agent's personality vector.
//!
//! Three traits in `[0, 1]` that gate response style. The state is a plain
//! value owned by the agent; learning produces a new value rather than
//! mutating shared state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utilities::config::PersonalityConfig;

/// Names of the personality traits, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitName {
    Curiosity,
    Helpfulness,
    Verbosity,
}

impl TraitName {
    pub const ALL: [TraitName; 3] = [Self::Curiosity, Self::Helpfulness, Self::Verbosity];

    /// Key used in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curiosity => "curiosity",
            Self::Helpfulness => "helpfulness",
            Self::Verbosity => "verbosity",
        }
    }
}

impl fmt::Display for TraitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current trait values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityState {
    pub curiosity: f64,
    pub helpfulness: f64,
    pub verbosity: f64,
}

impl From<PersonalityConfig> for PersonalityState {
    fn from(config: PersonalityConfig) -> Self {
        Self {
            curiosity: config.curiosity,
            helpfulness: config.helpfulness,
            verbosity: config.verbosity,
        }
    }
}

impl Default for PersonalityState {
    fn default() -> Self {
        PersonalityConfig::default().into()
    }
}

impl PersonalityState {
    pub fn get(&self, name: TraitName) -> f64 {
        match name {
            TraitName::Curiosity => self.curiosity,
            TraitName::Helpfulness => self.helpfulness,
            TraitName::Verbosity => self.verbosity,
        }
    }

    /// Set a trait, clamped to `[0, 1]`.
    pub fn set(&mut self, name: TraitName, value: f64) {
        let value = value.clamp(0.0, 1.0);
        match name {
            TraitName::Curiosity => self.curiosity = value,
            TraitName::Helpfulness => self.helpfulness = value,
            TraitName::Verbosity => self.verbosity = value,
        }
    }

    /// Raise a trait by `step`, capped at 1.0.
    pub fn increase(&mut self, name: TraitName, step: f64) {
        self.set(name, (self.get(name) + step).min(1.0));
    }

    /// Lower a trait by `step`, never below `floor`.
    pub fn decrease(&mut self, name: TraitName, step: f64, floor: f64) {
        self.set(name, (self.get(name) - step).max(floor));
    }

    /// Every trait raised to at least `floor` (and at most 1.0).
    pub fn floored(mut self, floor: f64) -> Self {
        for name in TraitName::ALL {
            self.set(name, self.get(name).max(floor));
        }
        self
    }

    /// `(name, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (TraitName, f64)> + '_ {
        TraitName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    /// Pairs keyed by store name, ready for a full overwrite.
    pub fn to_pairs(&self) -> Vec<(&'static str, f64)> {
        self.iter().map(|(name, value)| (name.as_str(), value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_config_defaults() {
        let p = PersonalityState::default();
        assert_eq!(p.curiosity, 0.7);
        assert_eq!(p.helpfulness, 0.8);
        assert_eq!(p.verbosity, 0.6);
    }

    #[test]
    fn test_increase_caps_at_one() {
        let mut p = PersonalityState::default();
        for _ in 0..20 {
            p.increase(TraitName::Curiosity, 0.05);
        }
        assert_eq!(p.curiosity, 1.0);
    }

    #[test]
    fn test_decrease_stops_at_floor() {
        let mut p = PersonalityState::default();
        for _ in 0..20 {
            p.decrease(TraitName::Verbosity, 0.05, 0.3);
        }
        assert_eq!(p.verbosity, 0.3);
    }

    #[test]
    fn test_set_clamps_out_of_range() {
        let mut p = PersonalityState::default();
        p.set(TraitName::Helpfulness, 3.0);
        assert_eq!(p.helpfulness, 1.0);
        p.set(TraitName::Helpfulness, -1.0);
        assert_eq!(p.helpfulness, 0.0);
    }

    #[test]
    fn test_floored_lifts_low_traits_only() {
        let p = PersonalityState {
            curiosity: 0.1,
            helpfulness: 0.8,
            verbosity: 0.3,
        }
        .floored(0.3);
        assert_eq!(p.curiosity, 0.3);
        assert_eq!(p.helpfulness, 0.8);
        assert_eq!(p.verbosity, 0.3);
    }

    #[test]
    fn test_pairs_in_storage_order() {
        let pairs = PersonalityState::default().to_pairs();
        assert_eq!(
            pairs,
            vec![("curiosity", 0.7), ("helpfulness", 0.8), ("verbosity", 0.6)]
        );
    }
}
