// SPDX-License-Identifier: MIT

//! Generator - the node-facing adapter over a [`Model`]
//!
//! Nodes ask for either free text or a typed structured value. Structured
//! replies are checked at this boundary: the schema is derived from the
//! target type, the reply is decoded with serde, then `validate()` runs.
//! Nothing is retried; the first failure propagates to the executor.

use crate::adk::error::{ModelError, ReqflowError};
use crate::adk::model::{GenerationConfig, Model, ResponseFormat};
use crate::adk::prompt::PromptTemplate;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A value the collaborator returns under a declared schema
pub trait StructuredOutput: DeserializeOwned + JsonSchema {
    /// Value constraints serde cannot express (ranges, non-empty, ...)
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Schema name and JSON schema for a structured type
pub fn schema_of<T: JsonSchema>() -> (String, serde_json::Value) {
    let schema = schemars::schema_for!(T);
    let value = serde_json::to_value(&schema).unwrap_or_default();
    (T::schema_name(), value)
}

pub struct Generator {
    model: Arc<dyn Model>,
    config: GenerationConfig,
}

impl Generator {
    pub fn new(model: Arc<dyn Model>, config: GenerationConfig) -> Self {
        Self { model, config }
    }

    /// Free-text reply
    pub async fn text(
        &self,
        prompt: &PromptTemplate,
        vars: &[(&str, &str)],
    ) -> Result<String, ReqflowError> {
        let history = prompt.render(vars)?;
        let reply = self
            .model
            .generate_content(&history, Some(&self.config), &ResponseFormat::Text)
            .await?;

        if reply.structured().is_some() {
            return Err(ModelError::InvalidResponse(
                "structured reply where free text was expected".to_string(),
            )
            .into());
        }

        Ok(reply.text())
    }

    /// Schema-checked structured reply
    pub async fn structured<T: StructuredOutput>(
        &self,
        prompt: &PromptTemplate,
        vars: &[(&str, &str)],
    ) -> Result<T, ReqflowError> {
        let history = prompt.render(vars)?;
        let (name, schema) = schema_of::<T>();
        let format = ResponseFormat::JsonSchema {
            name: name.clone(),
            schema,
        };

        let reply = self
            .model
            .generate_content(&history, Some(&self.config), &format)
            .await?;

        let value = reply.structured().cloned().ok_or_else(|| ModelError::Decode {
            schema: name.clone(),
            message: "reply carried no structured part".to_string(),
        })?;

        let decoded: T = serde_json::from_value(value).map_err(|e| ModelError::Decode {
            schema: name.clone(),
            message: e.to_string(),
        })?;

        decoded
            .validate()
            .map_err(|message| ModelError::Validation {
                schema: name,
                message,
            })?;

        Ok(decoded)
    }
}
