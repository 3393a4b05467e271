// SPDX-License-Identifier: MIT

//! Anthropic Model - Claude API implementation
//!
//! Structured replies are requested by offering a single tool whose input
//! schema is the declared schema and forcing the model to call it.

use super::{status_error, Content, GenerationConfig, Model, Part, ResponseFormat};
use crate::adk::error::{ModelError, ReqflowError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

/// Anthropic Claude model implementation
pub struct AnthropicModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl AnthropicModel {
    /// Create a new AnthropicModel
    ///
    /// Requires `ANTHROPIC_API_KEY` environment variable to be set.
    /// Optionally uses `ANTHROPIC_BASE_URL` for custom endpoints.
    pub fn new(model_name: String) -> Result<Self, ReqflowError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ModelError::ApiKeyMissing("Anthropic".to_string()))?;
        let base_url = env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
        })
    }

    /// Extract system message from history
    fn extract_system_message(history: &[Content]) -> Option<String> {
        history
            .iter()
            .find(|c| c.role == "system")
            .map(|c| c.text())
            .filter(|t| !t.is_empty())
    }

    /// Convert internal Content to Anthropic message format
    fn content_to_anthropic_message(content: &Content) -> Option<serde_json::Value> {
        // System messages go in the top-level `system` field
        if content.role == "system" {
            return None;
        }

        let role = match content.role.as_str() {
            "model" => "assistant",
            other => other,
        };

        let text = content.text();
        if text.is_empty() {
            return None;
        }

        Some(json!({
            "role": role,
            "content": [{"type": "text", "text": text}]
        }))
    }

    /// Forced single-tool declaration for a structured reply
    fn schema_tool(format: &ResponseFormat) -> Option<(serde_json::Value, serde_json::Value)> {
        match format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonSchema { name, schema } => Some((
                json!([{
                    "name": name,
                    "description": format!("Record the reply as a {} object", name),
                    "input_schema": schema
                }]),
                json!({"type": "tool", "name": name}),
            )),
        }
    }

    /// Parse Anthropic response into Content
    fn parse_anthropic_response(
        response: &serde_json::Value,
        format: &ResponseFormat,
    ) -> Result<Content, ReqflowError> {
        let content_blocks = response["content"]
            .as_array()
            .ok_or_else(|| ModelError::InvalidResponse("No content in Anthropic response".into()))?;

        if let Some(stop_reason) = response["stop_reason"].as_str() {
            log::debug!("Anthropic stop reason: {}", stop_reason);
        }

        let mut parts = Vec::new();
        for block in content_blocks {
            match block["type"].as_str() {
                Some("text") => {
                    if let Some(text) = block["text"].as_str() {
                        if !text.is_empty() {
                            parts.push(Part::Text(text.to_string()));
                        }
                    }
                }
                Some("tool_use") => parts.push(Part::Structured(block["input"].clone())),
                _ => {}
            }
        }

        if let ResponseFormat::JsonSchema { name, .. } = format {
            if !parts.iter().any(|p| matches!(p, Part::Structured(_))) {
                return Err(ModelError::Decode {
                    schema: name.clone(),
                    message: "no tool_use block in reply".to_string(),
                }
                .into());
            }
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for AnthropicModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        format: &ResponseFormat,
    ) -> Result<Content, ReqflowError> {
        let url = format!("{}/messages", self.base_url);

        let system = Self::extract_system_message(history);
        let messages: Vec<serde_json::Value> = history
            .iter()
            .filter_map(Self::content_to_anthropic_message)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages,
            "max_tokens": config.and_then(|c| c.max_output_tokens).unwrap_or(4096)
        });

        if let Some(sys) = system {
            body["system"] = json!(sys);
        }

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
        }

        if let Some((tools, choice)) = Self::schema_tool(format) {
            body["tools"] = tools;
            body["tool_choice"] = choice;
        }

        log::debug!(
            "Anthropic request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let text = resp.text().await?;
            return Err(status_error("Anthropic", status, retry_after, text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("Anthropic response: {}", resp_json);

        Self::parse_anthropic_response(&resp_json, format)
    }
}
