// SPDX-License-Identifier: MIT

//! OpenAI Model - ChatGPT API implementation

use super::{status_error, Content, GenerationConfig, Model, Part, ResponseFormat};
use crate::adk::error::{ModelError, ReqflowError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

/// OpenAI ChatGPT model implementation
pub struct OpenAIModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAIModel {
    /// Create a new OpenAIModel
    ///
    /// Requires `OPENAI_API_KEY` environment variable to be set.
    /// Optionally uses `OPENAI_BASE_URL` for custom endpoints.
    pub fn new(model_name: String) -> Result<Self, ReqflowError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::ApiKeyMissing("OpenAI".to_string()))?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
        })
    }

    /// Convert internal Content to OpenAI message format
    fn content_to_openai_message(content: &Content) -> serde_json::Value {
        let role = match content.role.as_str() {
            "system" => "system",
            "user" => "user",
            "model" => "assistant",
            other => other,
        };

        let text = content
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(t) => t.clone(),
                Part::Structured(v) => v.to_string(),
            })
            .collect::<Vec<_>>()
            .join("");

        json!({
            "role": role,
            "content": text
        })
    }

    /// Convert the requested format to the `response_format` field
    fn response_format(format: &ResponseFormat) -> Option<serde_json::Value> {
        match format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonSchema { name, schema } => Some(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "schema": schema
                }
            })),
        }
    }

    /// Parse OpenAI response into Content
    fn parse_openai_response(
        response: &serde_json::Value,
        format: &ResponseFormat,
    ) -> Result<Content, ReqflowError> {
        let choice = response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| ModelError::InvalidResponse("No choices in OpenAI response".into()))?;

        let message = &choice["message"];
        if let Some(refusal) = message["refusal"].as_str() {
            return Err(ModelError::InvalidResponse(format!("refused: {}", refusal)).into());
        }

        let text = message["content"]
            .as_str()
            .ok_or_else(|| ModelError::InvalidResponse("No content in OpenAI message".into()))?;

        let part = match format {
            ResponseFormat::Text => Part::Text(text.to_string()),
            ResponseFormat::JsonSchema { name, .. } => {
                let value = serde_json::from_str(text).map_err(|e| ModelError::Decode {
                    schema: name.clone(),
                    message: e.to_string(),
                })?;
                Part::Structured(value)
            }
        };

        Ok(Content {
            role: "model".to_string(),
            parts: vec![part],
        })
    }
}

#[async_trait]
impl Model for OpenAIModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        format: &ResponseFormat,
    ) -> Result<Content, ReqflowError> {
        let url = format!("{}/chat/completions", self.base_url);

        let messages: Vec<serde_json::Value> = history
            .iter()
            .map(Self::content_to_openai_message)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages
        });

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                body["max_tokens"] = json!(max_tokens);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
        }

        if let Some(rf) = Self::response_format(format) {
            body["response_format"] = rf;
        }

        log::debug!(
            "OpenAI request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
            return Err(status_error("OpenAI", status, retry_after, text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("OpenAI response: {}", resp_json);

        Self::parse_openai_response(&resp_json, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_format() -> ResponseFormat {
        ResponseFormat::JsonSchema {
            name: "Assessment".to_string(),
            schema: json!({"type": "object"}),
        }
    }

    #[test]
    fn test_content_to_openai_assistant_message() {
        let content = Content::new("model", "I can help");
        let msg = OpenAIModel::content_to_openai_message(&content);
        assert_eq!(msg["role"], "assistant");
        assert_eq!(msg["content"], "I can help");
    }

    #[test]
    fn test_content_to_openai_system_message() {
        let content = Content::new("system", "You are helpful");
        let msg = OpenAIModel::content_to_openai_message(&content);
        assert_eq!(msg["role"], "system");
        assert_eq!(msg["content"], "You are helpful");
    }

    #[test]
    fn test_response_format_json_schema() {
        assert!(OpenAIModel::response_format(&ResponseFormat::Text).is_none());
        let rf = OpenAIModel::response_format(&schema_format()).unwrap();
        assert_eq!(rf["type"], "json_schema");
        assert_eq!(rf["json_schema"]["name"], "Assessment");
    }

    #[test]
    fn test_parse_openai_text_response() {
        let response = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Hello"}
            }]
        });

        let content =
            OpenAIModel::parse_openai_response(&response, &ResponseFormat::Text).unwrap();
        assert_eq!(content.role, "model");
        assert_eq!(content.parts, vec![Part::Text("Hello".to_string())]);
    }

    #[test]
    fn test_parse_openai_structured_response() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"verdict\": true, \"reason\": \"ok\"}"
                }
            }]
        });

        let content = OpenAIModel::parse_openai_response(&response, &schema_format()).unwrap();
        assert_eq!(
            content.structured(),
            Some(&json!({"verdict": true, "reason": "ok"}))
        );
    }

    #[test]
    fn test_parse_openai_malformed_structured_response() {
        let response = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "not json"}
            }]
        });

        let err = OpenAIModel::parse_openai_response(&response, &schema_format()).unwrap_err();
        assert!(matches!(err, ReqflowError::Model(ModelError::Decode { .. })));
    }

    #[test]
    fn test_parse_openai_no_choices() {
        let err = OpenAIModel::parse_openai_response(&json!({"choices": []}), &ResponseFormat::Text)
            .unwrap_err();
        assert!(matches!(
            err,
            ReqflowError::Model(ModelError::InvalidResponse(_))
        ));
    }
}
