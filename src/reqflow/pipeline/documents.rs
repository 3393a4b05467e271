// SPDX-License-Identifier: MIT

//! Document nodes: requirements, environment analysis, revision and pitch

use crate::adk::error::{ReqflowError, WorkflowError};
use crate::adk::generator::Generator;
use crate::reqflow::pipeline::assessment::environment_text;
use crate::reqflow::pipeline::{bullets, format_interviews, or_none, prompts};
use crate::reqflow::types::{AssessmentKind, ExternalEnvironmentAnalysis};
use crate::reqflow::workflow::graph::Node;
use crate::reqflow::workflow::state::{StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// `generate_requirements`
pub struct RequirementsNode {
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for RequirementsNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let interviews = format_interviews(state.interviews.as_slice());
        let doc = self
            .generator
            .text(
                &prompts::REQUIREMENTS,
                &[
                    ("user_request", state.user_request.as_str()),
                    ("log", state.clarification_log.as_str()),
                    ("interviews", interviews.as_str()),
                ],
            )
            .await?;

        Ok(StateUpdate {
            requirements_doc: Some(doc),
            ..Default::default()
        })
    }
}

/// `analyze_environment`
pub struct AnalyzeEnvironmentNode {
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for AnalyzeEnvironmentNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let analysis: ExternalEnvironmentAnalysis = self
            .generator
            .structured(
                &prompts::ENVIRONMENT,
                &[("requirements", state.requirements_doc.as_str())],
            )
            .await?;

        Ok(StateUpdate {
            environment_analysis: Some(analysis),
            ..Default::default()
        })
    }
}

/// Reasons of every assessment that came back false, tagged by kind
pub fn failing_reasons(state: &WorkflowState) -> Vec<String> {
    AssessmentKind::ALL
        .iter()
        .filter_map(|kind| {
            state
                .assessment(*kind)
                .filter(|a| !a.verdict)
                .map(|a| format!("[{} NG] {}", kind, a.reason))
        })
        .collect()
}

/// `improve_requirements` - start of a refinement cycle
pub struct ImproveRequirementsNode {
    pub generator: Arc<Generator>,
    pub max_refinement_rounds: Option<u32>,
}

#[async_trait]
impl Node<WorkflowState> for ImproveRequirementsNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        if let Some(limit) = self.max_refinement_rounds {
            if state.refinement_round >= limit {
                return Err(WorkflowError::RefinementLimitExceeded { limit }.into());
            }
        }

        let failures = or_none(bullets(&failing_reasons(state)));
        let environment = environment_text(state);
        let improved = self
            .generator
            .text(
                &prompts::IMPROVE_REQUIREMENTS,
                &[
                    ("requirements", state.requirements_doc.as_str()),
                    ("environment", environment.as_str()),
                    ("failures", failures.as_str()),
                ],
            )
            .await?;

        let summary = self
            .generator
            .text(
                &prompts::SUMMARY_FROM_REQUIREMENTS,
                &[("requirements", improved.as_str())],
            )
            .await?;

        log::info!(
            "Refinement cycle {}: revised requirements, re-interviewing with added personas",
            state.refinement_round + 1
        );
        Ok(StateUpdate {
            requirements_doc: Some(improved),
            user_request: Some(summary),
            augment_personas: Some(true),
            followup_round: Some(0),
            refinement_round: Some(state.refinement_round + 1),
            ..Default::default()
        })
    }
}

/// `generate_pitch`
pub struct PitchNode {
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for PitchNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let interviews = format_interviews(state.interviews.as_slice());
        let pitch = self
            .generator
            .text(
                &prompts::PITCH,
                &[
                    ("user_request", state.user_request.as_str()),
                    ("interviews", interviews.as_str()),
                ],
            )
            .await?;

        Ok(StateUpdate {
            pitch_document: Some(pitch),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqflow::types::Assessment;

    #[test]
    fn test_failing_reasons_only_false_verdicts() {
        let state = WorkflowState {
            profitability: Some(Assessment::new(false, "no revenue model")),
            feasibility: Some(Assessment::new(true, "small scope")),
            legal: Some(Assessment::new(false, "scraping terms")),
            ..Default::default()
        };
        assert_eq!(
            failing_reasons(&state),
            vec![
                "[profitability NG] no revenue model".to_string(),
                "[legal NG] scraping terms".to_string(),
            ]
        );
    }

    #[test]
    fn test_failing_reasons_skips_missing() {
        assert!(failing_reasons(&WorkflowState::default()).is_empty());
    }
}
