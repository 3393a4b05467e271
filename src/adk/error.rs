// SPDX-License-Identifier: MIT

//! Typed error handling for reqflow-rs
//!
//! Errors fall into three families that callers treat differently:
//! configuration errors in the graph definition (`WorkflowError`),
//! collaborator failures (`ModelError`), and the non-termination guard
//! (`WorkflowError::StepLimitExceeded`). Insufficient information and
//! failed quality gates are routed outcomes, never errors.

use thiserror::Error;

/// Top-level error type for reqflow-rs
#[derive(Debug, Error)]
pub enum ReqflowError {
    /// API errors from the generation service
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// Configuration errors (missing env vars, invalid config values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph definition and execution errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Generation collaborator errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// A node failed; carries the node name for reporting
    #[error("Node '{node}' failed: {source}")]
    Node {
        node: String,
        #[source]
        source: Box<ReqflowError>,
    },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors raised by the graph engine itself
#[derive(Debug, Error, PartialEq)]
pub enum WorkflowError {
    /// Graph has no entry node
    #[error("Graph has no entry node")]
    MissingEntry,

    /// Edge or entry refers to a node that was never added
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Node registered twice under the same name
    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    /// Node has no outgoing edge
    #[error("Node '{0}' has no outgoing edge")]
    MissingEdge(String),

    /// Node has more than one outgoing edge
    #[error("Node '{0}' has more than one outgoing edge")]
    DuplicateEdge(String),

    /// Conditional edge declared with no labels
    #[error("Conditional edge from '{0}' declares no labels")]
    EmptyRouter(String),

    /// Router returned a label it never declared
    #[error("Router after '{node}' returned undeclared label '{label}'")]
    UnknownRoute { node: String, label: String },

    /// Partial update names a field the state schema does not declare
    #[error("Field '{0}' is not declared in the state schema")]
    UnknownField(String),

    /// Prompt placeholder with no bound variable
    #[error("Prompt variable '{0}' is not bound")]
    UnboundVariable(String),

    /// Global safety net: the graph did not reach END
    #[error("Graph did not terminate within {limit} steps")]
    StepLimitExceeded { limit: usize },

    /// Optional dedicated bound on the refinement loop
    #[error("Refinement loop exceeded {limit} rounds")]
    RefinementLimitExceeded { limit: u32 },
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for provider: {0}")]
    ApiKeyMissing(String),

    /// Provider not supported
    #[error("Provider not supported: {0}")]
    UnsupportedProvider(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    /// Structured reply did not decode into the declared schema
    #[error("Reply does not match schema '{schema}': {message}")]
    Decode { schema: String, message: String },

    /// Structured reply decoded but violates a value constraint
    #[error("Reply for schema '{schema}' failed validation: {message}")]
    Validation { schema: String, message: String },
}

impl ReqflowError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap an error raised inside a node
    pub fn in_node(node: impl Into<String>, source: ReqflowError) -> Self {
        Self::Node {
            node: node.into(),
            source: Box::new(source),
        }
    }

    /// True for failures that indicate a bug in the graph definition
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Workflow(e) => !matches!(
                e,
                WorkflowError::StepLimitExceeded { .. }
                    | WorkflowError::RefinementLimitExceeded { .. }
            ),
            Self::Node { source, .. } => source.is_configuration(),
            _ => false,
        }
    }

    /// True when the run was aborted by the step ceiling
    pub fn is_non_termination(&self) -> bool {
        matches!(
            self,
            Self::Workflow(WorkflowError::StepLimitExceeded { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, ReqflowError>;
