// SPDX-License-Identifier: MIT

//! Intake: the clarification questionnaire and the project summary

use crate::adk::error::ReqflowError;
use crate::adk::generator::Generator;
use crate::adk::input::InputCollector;
use crate::reqflow::pipeline::prompts;
use crate::reqflow::workflow::graph::Node;
use crate::reqflow::workflow::state::{StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// `clarification_interview` - the entry node
pub struct ClarificationNode {
    pub generator: Arc<Generator>,
    pub collector: Arc<dyn InputCollector>,
}

#[async_trait]
impl Node<WorkflowState> for ClarificationNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let questions = self
            .generator
            .text(
                &prompts::CLARIFICATION,
                &[
                    ("problem", state.initial_problem.as_str()),
                    ("persona", state.initial_persona.as_str()),
                    ("solution", state.initial_solution.as_str()),
                ],
            )
            .await?;

        self.collector.show(&questions);
        self.collector
            .show("Enter your answers (finish with an empty line):");
        let answers = self.collector.read_block()?;

        Ok(StateUpdate {
            clarification_log: Some(format!(
                "## Initial clarification\n\n### Questions\n{}\n\n### Answers\n{}",
                questions, answers
            )),
            ..Default::default()
        })
    }
}

/// `summarize_request`
pub struct SummarizeNode {
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for SummarizeNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let summary = self
            .generator
            .text(
                &prompts::SUMMARIZE_REQUEST,
                &[
                    ("problem", state.initial_problem.as_str()),
                    ("persona", state.initial_persona.as_str()),
                    ("solution", state.initial_solution.as_str()),
                    ("log", state.clarification_log.as_str()),
                ],
            )
            .await?;

        Ok(StateUpdate {
            user_request: Some(summary),
            ..Default::default()
        })
    }
}
