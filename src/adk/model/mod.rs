// SPDX-License-Identifier: MIT

//! Model module - defines the generation collaborator trait and shared types
//!
//! This module provides the core Model trait and shared types.
//! Model implementations are in their own submodules:
//! - [anthropic] - Anthropic's Claude API
//! - [openai] - OpenAI's ChatGPT API

pub mod anthropic;
pub mod openai;

use crate::adk::error::{ModelError, ReqflowError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Structured(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// First structured part, if any
    pub fn structured(&self) -> Option<&serde_json::Value> {
        self.parts.iter().find_map(|p| match p {
            Part::Structured(v) => Some(v),
            Part::Text(_) => None,
        })
    }
}

/// Tagged reply parts: free text or a schema-constrained value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Part {
    /// Free-text output
    Text(String),
    /// Value produced under a declared JSON schema (not yet decoded)
    Structured(serde_json::Value),
}

/// What shape of reply the caller expects
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    Text,
    JsonSchema {
        name: String,
        schema: serde_json::Value,
    },
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        format: &ResponseFormat,
    ) -> Result<Content, ReqflowError>;
}

/// Build a model from a provider name, inferring it from the model name
/// when `provider` is `None` (and `MODEL_PROVIDER` is unset).
pub fn from_provider(
    provider: Option<&str>,
    model_name: &str,
) -> Result<Arc<dyn Model>, ReqflowError> {
    let provider = provider
        .map(str::to_string)
        .or_else(|| env::var("MODEL_PROVIDER").ok())
        .unwrap_or_else(|| infer_provider(model_name).to_string());

    log::info!("Using provider: {} with model: {}", provider, model_name);

    match provider.to_ascii_lowercase().as_str() {
        "openai" => Ok(Arc::new(openai::OpenAIModel::new(model_name.to_string())?)),
        "anthropic" => Ok(Arc::new(anthropic::AnthropicModel::new(
            model_name.to_string(),
        )?)),
        _ => Err(ModelError::UnsupportedProvider(provider).into()),
    }
}

fn infer_provider(model_name: &str) -> &'static str {
    if model_name.starts_with("claude") {
        "anthropic"
    } else {
        "openai"
    }
}

/// Map an HTTP error status to a collaborator error
pub(crate) fn status_error(
    provider: &str,
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    body: String,
) -> ReqflowError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ModelError::RateLimited {
            retry_after_secs: retry_after,
        }
        .into()
    } else {
        ReqflowError::api(provider, format!("{}: {}", status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_text_skips_structured() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Text("a".to_string()),
                Part::Structured(json!({"x": 1})),
                Part::Text("b".to_string()),
            ],
        };
        assert_eq!(content.text(), "ab");
        assert_eq!(content.structured(), Some(&json!({"x": 1})));
    }

    #[test]
    fn test_infer_provider() {
        assert_eq!(infer_provider("claude-3-5-sonnet"), "anthropic");
        assert_eq!(infer_provider("gpt-4o"), "openai");
    }

    #[test]
    fn test_rate_limit_status() {
        let err = status_error(
            "OpenAI",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            Some(7),
            String::new(),
        );
        assert!(matches!(
            err,
            ReqflowError::Model(ModelError::RateLimited {
                retry_after_secs: Some(7)
            })
        ));

        let err = status_error(
            "OpenAI",
            reqwest::StatusCode::BAD_REQUEST,
            None,
            "bad".to_string(),
        );
        assert!(matches!(err, ReqflowError::Api { .. }));
    }
}
