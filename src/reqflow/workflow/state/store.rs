// SPDX-License-Identifier: MIT

//! Runtime state storage for workflow execution

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::accumulate::{Accumulate, AppendLog};
use super::schema::StateSchema;
use crate::adk::error::{ReqflowError, WorkflowError};
use crate::reqflow::types::{
    Assessment, AssessmentKind, EvaluationResult, ExternalEnvironmentAnalysis, Interview, Persona,
};
use crate::reqflow::workflow::graph::GraphState;

/// The single record threaded through a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowState {
    pub initial_problem: String,
    pub initial_persona: String,
    pub initial_solution: String,
    /// Running textual log of operator answers and synthesized assumptions
    pub clarification_log: String,
    /// Current project summary
    pub user_request: String,
    pub requirements_doc: String,
    pub pitch_document: String,
    /// Evaluation cycles since the persona set was last regenerated
    pub iteration: u32,
    /// Follow-up rounds in the current refinement cycle
    pub followup_round: u32,
    /// Completed refinement cycles
    pub refinement_round: u32,
    pub is_information_sufficient: bool,
    /// One-shot: keep existing personas and append a few fresh ones
    pub augment_personas: bool,
    pub evaluation: Option<EvaluationResult>,
    pub environment_analysis: Option<ExternalEnvironmentAnalysis>,
    pub profitability: Option<Assessment>,
    pub feasibility: Option<Assessment>,
    pub legal: Option<Assessment>,
    pub personas: AppendLog<Persona>,
    pub interviews: AppendLog<Interview>,
}

impl WorkflowState {
    /// Create the initial state of a run
    pub fn new(
        problem: impl Into<String>,
        persona: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            initial_problem: problem.into(),
            initial_persona: persona.into(),
            initial_solution: solution.into(),
            ..Default::default()
        }
    }

    /// Combine a partial update into this state, field by field
    pub fn merge(mut self, update: StateUpdate) -> Self {
        self.apply(update);
        self
    }

    /// In-place form of [`merge`](Self::merge)
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            initial_problem,
            initial_persona,
            initial_solution,
            clarification_log,
            user_request,
            requirements_doc,
            pitch_document,
            iteration,
            followup_round,
            refinement_round,
            is_information_sufficient,
            augment_personas,
            evaluation,
            environment_analysis,
            profitability,
            feasibility,
            legal,
            personas,
            interviews,
        } = update;

        replace(&mut self.initial_problem, initial_problem);
        replace(&mut self.initial_persona, initial_persona);
        replace(&mut self.initial_solution, initial_solution);
        replace(&mut self.clarification_log, clarification_log);
        replace(&mut self.user_request, user_request);
        replace(&mut self.requirements_doc, requirements_doc);
        replace(&mut self.pitch_document, pitch_document);
        replace(&mut self.iteration, iteration);
        replace(&mut self.followup_round, followup_round);
        replace(&mut self.refinement_round, refinement_round);
        replace(&mut self.is_information_sufficient, is_information_sufficient);
        replace(&mut self.augment_personas, augment_personas);

        if evaluation.is_some() {
            self.evaluation = evaluation;
        }
        if environment_analysis.is_some() {
            self.environment_analysis = environment_analysis;
        }
        if profitability.is_some() {
            self.profitability = profitability;
        }
        if feasibility.is_some() {
            self.feasibility = feasibility;
        }
        if legal.is_some() {
            self.legal = legal;
        }

        if let Some(op) = personas {
            self.personas.apply(op);
        }
        if let Some(op) = interviews {
            self.interviews.apply(op);
        }
    }

    pub fn assessment(&self, kind: AssessmentKind) -> Option<&Assessment> {
        match kind {
            AssessmentKind::Profitability => self.profitability.as_ref(),
            AssessmentKind::Feasibility => self.feasibility.as_ref(),
            AssessmentKind::Legal => self.legal.as_ref(),
        }
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// A subset of state fields with new values
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateUpdate {
    pub initial_problem: Option<String>,
    pub initial_persona: Option<String>,
    pub initial_solution: Option<String>,
    pub clarification_log: Option<String>,
    pub user_request: Option<String>,
    pub requirements_doc: Option<String>,
    pub pitch_document: Option<String>,
    pub iteration: Option<u32>,
    pub followup_round: Option<u32>,
    pub refinement_round: Option<u32>,
    pub is_information_sufficient: Option<bool>,
    pub augment_personas: Option<bool>,
    pub evaluation: Option<EvaluationResult>,
    pub environment_analysis: Option<ExternalEnvironmentAnalysis>,
    pub profitability: Option<Assessment>,
    pub feasibility: Option<Assessment>,
    pub legal: Option<Assessment>,
    pub personas: Option<Accumulate<Persona>>,
    pub interviews: Option<Accumulate<Interview>>,
}

impl StateUpdate {
    /// Build a partial update from a JSON object.
    ///
    /// Keys the schema does not declare are rejected with
    /// [`WorkflowError::UnknownField`]; append fields take the
    /// `{"append": [...]}` / `{"reset": [...]}` form.
    pub fn from_json(value: Value) -> Result<Self, ReqflowError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ReqflowError::config("partial update must be a JSON object"))?;

        if let Some(key) = obj.keys().find(|k| !StateSchema::is_declared(k)) {
            return Err(WorkflowError::UnknownField(key.clone()).into());
        }

        Ok(serde_json::from_value(value)?)
    }

    /// An update for one assessor's verdict
    pub fn assessment(kind: AssessmentKind, assessment: Assessment) -> Self {
        let mut update = Self::default();
        match kind {
            AssessmentKind::Profitability => update.profitability = Some(assessment),
            AssessmentKind::Feasibility => update.feasibility = Some(assessment),
            AssessmentKind::Legal => update.legal = Some(assessment),
        }
        update
    }

    /// Names of the fields this update writes
    pub fn fields(&self) -> Vec<&'static str> {
        let present = [
            ("initial_problem", self.initial_problem.is_some()),
            ("initial_persona", self.initial_persona.is_some()),
            ("initial_solution", self.initial_solution.is_some()),
            ("clarification_log", self.clarification_log.is_some()),
            ("user_request", self.user_request.is_some()),
            ("requirements_doc", self.requirements_doc.is_some()),
            ("pitch_document", self.pitch_document.is_some()),
            ("iteration", self.iteration.is_some()),
            ("followup_round", self.followup_round.is_some()),
            ("refinement_round", self.refinement_round.is_some()),
            (
                "is_information_sufficient",
                self.is_information_sufficient.is_some(),
            ),
            ("augment_personas", self.augment_personas.is_some()),
            ("evaluation", self.evaluation.is_some()),
            ("environment_analysis", self.environment_analysis.is_some()),
            ("profitability", self.profitability.is_some()),
            ("feasibility", self.feasibility.is_some()),
            ("legal", self.legal.is_some()),
            ("personas", self.personas.is_some()),
            ("interviews", self.interviews.is_some()),
        ];
        present
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

impl GraphState for WorkflowState {
    type Update = StateUpdate;

    fn merge(self, update: StateUpdate) -> Self {
        WorkflowState::merge(self, update)
    }

    fn update_fields(update: &StateUpdate) -> Vec<&'static str> {
        update.fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqflow::workflow::state::MergePolicy;
    use serde_json::json;

    fn persona(name: &str) -> Persona {
        Persona::new(name, format!("{} background", name))
    }

    fn interview(name: &str, q: &str) -> Interview {
        Interview {
            persona: persona(name),
            question: q.to_string(),
            answer: format!("{} answers {}", name, q),
        }
    }

    #[test]
    fn test_new_state() {
        let state = WorkflowState::new("problem", "persona", "solution");
        assert_eq!(state.initial_problem, "problem");
        assert_eq!(state.followup_round, 0);
        assert!(state.personas.is_empty());
        assert!(state.profitability.is_none());
    }

    #[test]
    fn test_replace_fields_reflect_last_write() {
        let state = WorkflowState::new("p", "q", "s");
        let updates = vec![
            StateUpdate {
                user_request: Some("first".to_string()),
                iteration: Some(1),
                ..Default::default()
            },
            StateUpdate {
                iteration: Some(2),
                ..Default::default()
            },
            StateUpdate {
                user_request: Some("third".to_string()),
                ..Default::default()
            },
        ];

        let state = updates.into_iter().fold(state, WorkflowState::merge);
        assert_eq!(state.user_request, "third");
        assert_eq!(state.iteration, 2);
        assert_eq!(state.initial_problem, "p");
    }

    #[test]
    fn test_append_fields_concatenate_in_order() {
        let state = WorkflowState::default();
        let batches = vec![
            vec![interview("A", "q1"), interview("A", "q2")],
            vec![],
            vec![interview("B", "q1")],
        ];

        let state = batches.iter().cloned().fold(state, |s, batch| {
            s.merge(StateUpdate {
                interviews: Some(Accumulate::Append(batch)),
                ..Default::default()
            })
        });

        let expected: Vec<Interview> = batches.into_iter().flatten().collect();
        assert_eq!(state.interviews.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_explicit_reset() {
        let state = WorkflowState::default().merge(StateUpdate {
            personas: Some(Accumulate::Append(vec![persona("A"), persona("B")])),
            interviews: Some(Accumulate::Append(vec![interview("A", "q")])),
            ..Default::default()
        });

        let state = state.merge(StateUpdate {
            interviews: Some(Accumulate::Reset(vec![])),
            ..Default::default()
        });
        assert!(state.interviews.is_empty());
        assert_eq!(state.personas.len(), 2);
    }

    #[test]
    fn test_absent_fields_carry_over() {
        let state = WorkflowState::default().merge(StateUpdate {
            legal: Some(Assessment::new(true, "fine")),
            augment_personas: Some(true),
            ..Default::default()
        });
        let state = state.merge(StateUpdate::default());
        assert_eq!(state.legal, Some(Assessment::new(true, "fine")));
        assert!(state.augment_personas);
    }

    #[test]
    fn test_assessment_update_targets_one_field() {
        let update = StateUpdate::assessment(
            AssessmentKind::Feasibility,
            Assessment::new(false, "too big"),
        );
        assert_eq!(update.fields(), vec!["feasibility"]);

        let state = WorkflowState::default().merge(update);
        assert_eq!(
            state.assessment(AssessmentKind::Feasibility),
            Some(&Assessment::new(false, "too big"))
        );
        assert!(state.assessment(AssessmentKind::Legal).is_none());
    }

    #[test]
    fn test_from_json_accepts_declared_fields() {
        let update = StateUpdate::from_json(json!({
            "user_request": "summary",
            "followup_round": 1,
            "personas": {"append": [{"name": "A", "background": "b"}]}
        }))
        .unwrap();

        assert_eq!(update.user_request.as_deref(), Some("summary"));
        assert_eq!(update.followup_round, Some(1));
        assert_eq!(
            update.personas,
            Some(Accumulate::Append(vec![Persona::new("A", "b")]))
        );
    }

    #[test]
    fn test_from_json_rejects_undeclared_field() {
        let err = StateUpdate::from_json(json!({"user_request": "x", "budget": 10})).unwrap_err();
        assert!(matches!(
            err,
            ReqflowError::Workflow(WorkflowError::UnknownField(ref f)) if f == "budget"
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(StateUpdate::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_every_update_field_is_declared() {
        let full = StateUpdate {
            initial_problem: Some(String::new()),
            initial_persona: Some(String::new()),
            initial_solution: Some(String::new()),
            clarification_log: Some(String::new()),
            user_request: Some(String::new()),
            requirements_doc: Some(String::new()),
            pitch_document: Some(String::new()),
            iteration: Some(0),
            followup_round: Some(0),
            refinement_round: Some(0),
            is_information_sufficient: Some(false),
            augment_personas: Some(false),
            evaluation: Some(EvaluationResult {
                reason: String::new(),
                is_sufficient: false,
                gaps: vec![],
                followup_questions: vec![],
            }),
            environment_analysis: Some(ExternalEnvironmentAnalysis {
                customer_analysis: String::new(),
                competitor_analysis: String::new(),
                company_analysis: String::new(),
                pest_analysis: String::new(),
                summary_and_strategy: String::new(),
            }),
            profitability: Some(Assessment::new(true, "")),
            feasibility: Some(Assessment::new(true, "")),
            legal: Some(Assessment::new(true, "")),
            personas: Some(Accumulate::Append(vec![])),
            interviews: Some(Accumulate::Append(vec![])),
        };

        let fields = full.fields();
        assert_eq!(fields.len(), StateSchema::fields().len());
        for name in fields {
            let policy = StateSchema::policy(name).unwrap();
            let expect_append = matches!(name, "personas" | "interviews");
            assert_eq!(policy == MergePolicy::Append, expect_append, "{}", name);
        }
    }
}
