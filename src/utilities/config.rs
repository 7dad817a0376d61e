//! Agent configuration.
//!
//! Loaded once at startup: defaults, then an optional YAML file, then
//! environment overrides (`RECALL_DB`, `RECALL_MAX_MEMORY`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utilities::errors::AgentError;
use crate::utilities::paths;

/// Initial trait values used when the store has none yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityConfig {
    pub curiosity: f64,
    pub helpfulness: f64,
    pub verbosity: f64,
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            curiosity: 0.7,
            helpfulness: 0.8,
            verbosity: 0.6,
        }
    }
}

/// Static configuration for a [`SelfLearningAgent`](crate::agent::SelfLearningAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// SQLite database file.
    pub database_file: PathBuf,
    /// Retention ceiling for stored interactions.
    pub max_memory_items: usize,
    /// Step applied to traits on feedback.
    pub learning_rate: f64,
    /// Starting personality on first run.
    pub personality: PersonalityConfig,
    /// Floor for traits lowered by negative feedback.
    pub min_trait: f64,
    /// How many recent interactions the similarity scan looks at.
    pub similarity_window: usize,
    /// How many similar interactions to return.
    pub similar_limit: usize,
    /// Chance that a chat turn triggers pruning.
    pub prune_probability: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            database_file: paths::default_db_path(),
            max_memory_items: 500,
            learning_rate: 0.05,
            personality: PersonalityConfig::default(),
            min_trait: 0.3,
            similarity_window: 50,
            similar_limit: 3,
            prune_probability: 0.1,
        }
    }
}

impl AgentConfig {
    /// Parse a YAML document; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AgentError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| AgentError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, AgentError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AgentError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration: YAML file if given, else defaults, then env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AgentError> {
        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RECALL_DB` and `RECALL_MAX_MEMORY` if set.
    pub fn apply_env_overrides(&mut self) -> Result<(), AgentError> {
        if let Ok(db) = std::env::var("RECALL_DB") {
            self.database_file = PathBuf::from(db);
        }
        if let Ok(max) = std::env::var("RECALL_MAX_MEMORY") {
            self.max_memory_items = max
                .parse()
                .map_err(|_| AgentError::Config(format!("RECALL_MAX_MEMORY={max:?} is not a count")))?;
        }
        Ok(())
    }

    /// Reject values outside their documented ranges.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(AgentError::Config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.min_trait) {
            return Err(AgentError::Config(format!(
                "min_trait must be in [0, 1], got {}",
                self.min_trait
            )));
        }
        let p = &self.personality;
        for (name, value) in [
            ("curiosity", p.curiosity),
            ("helpfulness", p.helpfulness),
            ("verbosity", p.verbosity),
        ] {
            if !(self.min_trait..=1.0).contains(&value) {
                return Err(AgentError::Config(format!(
                    "personality.{name} must be in [{}, 1], got {value}",
                    self.min_trait
                )));
            }
        }
        if self.max_memory_items == 0 {
            return Err(AgentError::Config("max_memory_items must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.prune_probability) {
            return Err(AgentError::Config(format!(
                "prune_probability must be in [0, 1], got {}",
                self.prune_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AgentConfig::default();
        assert_eq!(c.max_memory_items, 500);
        assert_eq!(c.learning_rate, 0.05);
        assert_eq!(c.personality.curiosity, 0.7);
        assert_eq!(c.personality.helpfulness, 0.8);
        assert_eq!(c.personality.verbosity, 0.6);
        assert_eq!(c.min_trait, 0.3);
        assert_eq!(c.similarity_window, 50);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
database_file: /tmp/brain.db
max_memory_items: 20
personality:
  curiosity: 0.4
"#;
        let c = AgentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(c.database_file, PathBuf::from("/tmp/brain.db"));
        assert_eq!(c.max_memory_items, 20);
        assert_eq!(c.personality.curiosity, 0.4);
        assert_eq!(c.personality.helpfulness, 0.8);
        assert_eq!(c.learning_rate, 0.05);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut c = AgentConfig::default();
        c.learning_rate = 0.0;
        assert!(matches!(c.validate(), Err(AgentError::Config(_))));

        let mut c = AgentConfig::default();
        c.personality.verbosity = 1.5;
        assert!(c.validate().is_err());

        let mut c = AgentConfig::default();
        c.personality.curiosity = 0.1;
        assert!(c.validate().is_err());
        c.min_trait = 0.0;
        assert!(c.validate().is_ok());

        let mut c = AgentConfig::default();
        c.max_memory_items = 0;
        assert!(c.validate().is_err());

        assert!(AgentConfig::from_yaml_str("prune_probability: 2.0").is_err());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.yaml");
        let mut original = AgentConfig::default();
        original.max_memory_items = 42;
        std::fs::write(&path, serde_yaml::to_string(&original).unwrap()).unwrap();

        let loaded = AgentConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AgentConfig::from_yaml_file(Path::new("/nonexistent/agent.yaml")).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }
}
