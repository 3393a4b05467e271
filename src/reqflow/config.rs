// SPDX-License-Identifier: MIT

//! Engine configuration - YAML loading, defaults and validation
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration. CLI flags are applied on top by the binary.

use crate::adk::error::ReqflowError;
use crate::adk::model::GenerationConfig;
use crate::reqflow::workflow::graph::{ExecutorConfig, DEFAULT_MAX_STEPS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Generation service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// `openai` or `anthropic`; inferred from `name` when unset
    pub provider: Option<String>,
    pub name: String,
    pub temperature: Option<f32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: None,
            name: "gpt-4o-mini".to_string(),
            temperature: Some(0.7),
        }
    }
}

impl ModelSettings {
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum personas kept by selection (k)
    pub persona_count: usize,
    pub questions_per_persona: usize,
    /// Minimum fit score for a candidate to be kept
    pub selection_threshold: f64,
    /// Upper bound on personas appended per refinement cycle
    pub max_new_personas: usize,
    /// Global step ceiling
    pub max_steps: usize,
    /// Dedicated bound on the refinement loop; unbounded when unset
    pub max_refinement_rounds: Option<u32>,
    pub model: ModelSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persona_count: 5,
            questions_per_persona: 3,
            selection_threshold: 0.8,
            max_new_personas: 3,
            max_steps: DEFAULT_MAX_STEPS,
            max_refinement_rounds: None,
            model: ModelSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReqflowError> {
        let path = path.as_ref();
        log::debug!("Loading engine config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse and validate a YAML configuration
    pub fn parse_yaml(content: &str) -> Result<Self, ReqflowError> {
        let config: EngineConfig = if content.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReqflowError> {
        if self.persona_count == 0 {
            return Err(ReqflowError::config("persona_count must be at least 1"));
        }
        if self.questions_per_persona == 0 {
            return Err(ReqflowError::config(
                "questions_per_persona must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.selection_threshold) {
            return Err(ReqflowError::config(format!(
                "selection_threshold {} is outside [0, 1]",
                self.selection_threshold
            )));
        }
        if self.max_new_personas == 0 {
            return Err(ReqflowError::config("max_new_personas must be at least 1"));
        }
        if self.max_steps == 0 {
            return Err(ReqflowError::config("max_steps must be at least 1"));
        }
        if self.model.name.trim().is_empty() {
            return Err(ReqflowError::config("model.name is empty"));
        }
        Ok(())
    }

    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_steps: self.max_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.persona_count, 5);
        assert_eq!(config.questions_per_persona, 3);
        assert_eq!(config.selection_threshold, 0.8);
        assert_eq!(config.max_steps, 100);
        assert!(config.max_refinement_rounds.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            EngineConfig::parse_yaml("").unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
persona_count: 3
max_refinement_rounds: 2
model:
  provider: anthropic
  name: claude-3-5-sonnet-latest
"#;
        let config = EngineConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.persona_count, 3);
        assert_eq!(config.max_refinement_rounds, Some(2));
        assert_eq!(config.model.provider.as_deref(), Some("anthropic"));
        assert_eq!(config.model.temperature, Some(0.7));
        assert_eq!(config.questions_per_persona, 3);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(EngineConfig::parse_yaml("persona_cnt: 3").is_err());
    }

    #[test]
    fn test_validation() {
        let err = EngineConfig::parse_yaml("selection_threshold: 1.5").unwrap_err();
        assert!(matches!(err, ReqflowError::Config(_)));

        assert!(EngineConfig::parse_yaml("persona_count: 0").is_err());
        assert!(EngineConfig::parse_yaml("max_steps: 0").is_err());
    }

    #[test]
    fn test_executor_config() {
        let config = EngineConfig {
            max_steps: 42,
            ..Default::default()
        };
        assert_eq!(config.executor().max_steps, 42);
    }
}
