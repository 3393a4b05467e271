// SPDX-License-Identifier: MIT

//! Quality assessments and the gate node

use crate::adk::error::ReqflowError;
use crate::adk::generator::Generator;
use crate::adk::prompt::PromptTemplate;
use crate::reqflow::pipeline::prompts;
use crate::reqflow::types::{Assessment, AssessmentKind};
use crate::reqflow::workflow::graph::Node;
use crate::reqflow::workflow::state::{StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// Passed to the collaborator before the environment has been analyzed
pub const NOT_AVAILABLE: &str = "(not available)";

fn prompt_for(kind: AssessmentKind) -> &'static PromptTemplate {
    match kind {
        AssessmentKind::Profitability => &*prompts::PROFITABILITY,
        AssessmentKind::Feasibility => &*prompts::FEASIBILITY,
        AssessmentKind::Legal => &*prompts::LEGAL,
    }
}

/// Environment analysis as prompt text, or a placeholder when absent
pub fn environment_text(state: &WorkflowState) -> String {
    state
        .environment_analysis
        .as_ref()
        .map(|a| a.to_prompt_text())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `assess_profitability`, `assess_feasibility` and `assess_legal`
pub struct AssessNode {
    pub kind: AssessmentKind,
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for AssessNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let environment = environment_text(state);
        let assessment: Assessment = self
            .generator
            .structured(
                prompt_for(self.kind),
                &[
                    ("requirements", state.requirements_doc.as_str()),
                    ("environment", environment.as_str()),
                ],
            )
            .await?;

        log::info!(
            "{}: {} ({})",
            self.kind,
            if assessment.verdict { "OK" } else { "NG" },
            assessment.reason
        );
        Ok(StateUpdate::assessment(self.kind, assessment))
    }
}

/// `assessment_gate` - writes nothing; its router decides
pub struct GateNode;

#[async_trait]
impl Node<WorkflowState> for GateNode {
    async fn run(&self, _state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        Ok(StateUpdate::default())
    }
}
