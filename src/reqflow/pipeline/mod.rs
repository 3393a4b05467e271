// SPDX-License-Identifier: MIT

//! The requirements pipeline
//!
//! Wires the pipeline nodes into a graph:
//!
//! ```text
//! clarification_interview -> summarize_request -> generate_personas
//!   -> conduct_interviews -> evaluate_information
//!        enough               -> generate_requirements
//!        need_followups       -> ask_followups -> summarize_request
//!        autofill_and_forward -> autofill_assumptions -> generate_requirements
//! generate_requirements -> analyze_environment -> assess_profitability
//!   -> assess_feasibility -> assess_legal -> assessment_gate
//!        all_true    -> generate_pitch -> END
//!        refine_loop -> improve_requirements -> generate_personas
//! ```

pub mod assessment;
pub mod documents;
pub mod intake;
pub mod interviews;
pub mod personas;
pub mod prompts;
pub mod routing;

use crate::adk::error::{ReqflowError, WorkflowError};
use crate::adk::generator::Generator;
use crate::adk::input::InputCollector;
use crate::adk::model::Model;
use crate::reqflow::config::EngineConfig;
use crate::reqflow::types::{AssessmentKind, Interview};
use crate::reqflow::workflow::graph::{CompiledGraph, GraphBuilder, RunReport, END};
use crate::reqflow::workflow::state::WorkflowState;
use std::sync::Arc;

use assessment::{AssessNode, GateNode};
use documents::{AnalyzeEnvironmentNode, ImproveRequirementsNode, PitchNode, RequirementsNode};
use intake::{ClarificationNode, SummarizeNode};
use interviews::{AskFollowupsNode, AutofillNode, ConductInterviewsNode, EvaluateNode};
use personas::GeneratePersonasNode;

pub const CLARIFICATION_INTERVIEW: &str = "clarification_interview";
pub const SUMMARIZE_REQUEST: &str = "summarize_request";
pub const GENERATE_PERSONAS: &str = "generate_personas";
pub const CONDUCT_INTERVIEWS: &str = "conduct_interviews";
pub const EVALUATE_INFORMATION: &str = "evaluate_information";
pub const ASK_FOLLOWUPS: &str = "ask_followups";
pub const AUTOFILL_ASSUMPTIONS: &str = "autofill_assumptions";
pub const GENERATE_REQUIREMENTS: &str = "generate_requirements";
pub const ANALYZE_ENVIRONMENT: &str = "analyze_environment";
pub const ASSESSMENT_GATE: &str = "assessment_gate";
pub const IMPROVE_REQUIREMENTS: &str = "improve_requirements";
pub const GENERATE_PITCH: &str = "generate_pitch";

/// `- item` per line
pub(crate) fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn or_none(text: String) -> String {
    if text.trim().is_empty() {
        "(none)".to_string()
    } else {
        text
    }
}

pub(crate) fn format_interviews(interviews: &[Interview]) -> String {
    let text = interviews
        .iter()
        .map(|i| {
            format!(
                "Persona: {}\nQuestion: {}\nAnswer: {}\n",
                i.persona.name, i.question, i.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    or_none(text)
}

/// Build the pipeline graph
pub fn build_graph(
    generator: Arc<Generator>,
    collector: Arc<dyn InputCollector>,
    config: &EngineConfig,
) -> Result<CompiledGraph<WorkflowState>, WorkflowError> {
    let mut builder = GraphBuilder::<WorkflowState>::new()
        .add_node(
            CLARIFICATION_INTERVIEW,
            ClarificationNode {
                generator: generator.clone(),
                collector: collector.clone(),
            },
        )
        .add_node(
            SUMMARIZE_REQUEST,
            SummarizeNode {
                generator: generator.clone(),
            },
        )
        .add_node(
            GENERATE_PERSONAS,
            GeneratePersonasNode {
                generator: generator.clone(),
                persona_count: config.persona_count,
                threshold: config.selection_threshold,
                max_new: config.max_new_personas,
            },
        )
        .add_node(
            CONDUCT_INTERVIEWS,
            ConductInterviewsNode {
                generator: generator.clone(),
                questions_per_persona: config.questions_per_persona,
            },
        )
        .add_node(
            EVALUATE_INFORMATION,
            EvaluateNode {
                generator: generator.clone(),
            },
        )
        .add_node(
            ASK_FOLLOWUPS,
            AskFollowupsNode {
                generator: generator.clone(),
                collector,
            },
        )
        .add_node(
            AUTOFILL_ASSUMPTIONS,
            AutofillNode {
                generator: generator.clone(),
            },
        )
        .add_node(
            GENERATE_REQUIREMENTS,
            RequirementsNode {
                generator: generator.clone(),
            },
        )
        .add_node(
            ANALYZE_ENVIRONMENT,
            AnalyzeEnvironmentNode {
                generator: generator.clone(),
            },
        );

    for kind in AssessmentKind::ALL {
        builder = builder.add_node(
            kind.node_name(),
            AssessNode {
                kind,
                generator: generator.clone(),
            },
        );
    }

    builder
        .add_node(ASSESSMENT_GATE, GateNode)
        .add_node(
            IMPROVE_REQUIREMENTS,
            ImproveRequirementsNode {
                generator: generator.clone(),
                max_refinement_rounds: config.max_refinement_rounds,
            },
        )
        .add_node(GENERATE_PITCH, PitchNode { generator })
        .set_entry(CLARIFICATION_INTERVIEW)
        .add_edge(CLARIFICATION_INTERVIEW, SUMMARIZE_REQUEST)
        .add_edge(SUMMARIZE_REQUEST, GENERATE_PERSONAS)
        .add_edge(GENERATE_PERSONAS, CONDUCT_INTERVIEWS)
        .add_edge(CONDUCT_INTERVIEWS, EVALUATE_INFORMATION)
        .add_conditional_edges(
            EVALUATE_INFORMATION,
            |s: &WorkflowState| routing::after_evaluation(s).to_string(),
            [
                (routing::ENOUGH, GENERATE_REQUIREMENTS),
                (routing::NEED_FOLLOWUPS, ASK_FOLLOWUPS),
                (routing::AUTOFILL_AND_FORWARD, AUTOFILL_ASSUMPTIONS),
            ],
        )
        .add_edge(ASK_FOLLOWUPS, SUMMARIZE_REQUEST)
        .add_edge(AUTOFILL_ASSUMPTIONS, GENERATE_REQUIREMENTS)
        .add_edge(GENERATE_REQUIREMENTS, ANALYZE_ENVIRONMENT)
        .add_edge(ANALYZE_ENVIRONMENT, AssessmentKind::Profitability.node_name())
        .add_edge(
            AssessmentKind::Profitability.node_name(),
            AssessmentKind::Feasibility.node_name(),
        )
        .add_edge(
            AssessmentKind::Feasibility.node_name(),
            AssessmentKind::Legal.node_name(),
        )
        .add_edge(AssessmentKind::Legal.node_name(), ASSESSMENT_GATE)
        .add_conditional_edges(
            ASSESSMENT_GATE,
            |s: &WorkflowState| routing::assessment_gate(s).to_string(),
            [
                (routing::ALL_TRUE, GENERATE_PITCH),
                (routing::REFINE_LOOP, IMPROVE_REQUIREMENTS),
            ],
        )
        .add_edge(IMPROVE_REQUIREMENTS, GENERATE_PERSONAS)
        .add_edge(GENERATE_PITCH, END)
        .compile(config.executor())
}

/// A compiled pipeline bound to one model and one input collector
pub struct Pipeline {
    graph: CompiledGraph<WorkflowState>,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn Model>,
        collector: Arc<dyn InputCollector>,
        config: &EngineConfig,
    ) -> Result<Self, ReqflowError> {
        config.validate()?;
        let generator = Arc::new(Generator::new(model, config.model.generation_config()));
        let graph = build_graph(generator, collector, config)?;
        Ok(Self { graph })
    }

    /// Run from the three initial statements to END
    pub async fn run(
        &self,
        problem: &str,
        persona: &str,
        solution: &str,
    ) -> Result<RunReport<WorkflowState>, ReqflowError> {
        self.graph
            .run(WorkflowState::new(problem, persona, solution))
            .await
    }
}

/// Run the pipeline with default settings and `k` personas, returning the
/// final merged state.
pub async fn run(
    model: Arc<dyn Model>,
    collector: Arc<dyn InputCollector>,
    problem: &str,
    persona: &str,
    solution: &str,
    k: usize,
) -> Result<WorkflowState, ReqflowError> {
    let config = EngineConfig {
        persona_count: k,
        ..Default::default()
    };
    let report = Pipeline::new(model, collector, &config)?
        .run(problem, persona, solution)
        .await?;
    Ok(report.state)
}
