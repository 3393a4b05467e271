// SPDX-License-Identifier: MIT

//! Persona generation: constraint extraction, scored candidates, selection
//! and the augment-on-refinement handling.

use crate::adk::error::ReqflowError;
use crate::adk::generator::Generator;
use crate::reqflow::pipeline::prompts;
use crate::reqflow::types::{Persona, PersonaConstraints, ScoredPersona, ScoredPersonas};
use crate::reqflow::workflow::graph::Node;
use crate::reqflow::workflow::state::{Accumulate, StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// Keep candidates scoring at least `threshold`, best first, at most `k`.
///
/// When nothing clears the threshold the first `k` candidates are kept in
/// the order they were returned, so a miscalibrated scorer never leaves the
/// pipeline without personas.
pub fn select_personas(candidates: Vec<ScoredPersona>, k: usize, threshold: f64) -> Vec<Persona> {
    let (mut kept, rest): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.fit_score >= threshold);

    if kept.is_empty() {
        log::warn!(
            "No persona candidate reached {:.2}; keeping the first {} as returned",
            threshold,
            k
        );
        kept = rest;
    } else {
        // sort_by is stable: equal scores keep their returned order
        kept.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));
    }

    kept.into_iter()
        .take(k)
        .map(ScoredPersona::into_persona)
        .collect()
}

/// Partial update for a freshly selected persona set.
///
/// With the augment flag set and a non-empty prior set, the prior set is
/// kept and at most `max_new` of the selection not already in it is
/// appended, and the
/// interview log restarts for a fresh pass. Otherwise the set is replaced.
/// The flag is cleared whenever it was set.
pub fn persona_update(state: &WorkflowState, selected: Vec<Persona>, max_new: usize) -> StateUpdate {
    let mut update = StateUpdate {
        iteration: Some(0),
        is_information_sufficient: Some(false),
        ..Default::default()
    };

    if state.augment_personas {
        update.augment_personas = Some(false);
        update.interviews = Some(Accumulate::Reset(Vec::new()));
    }

    if state.augment_personas && !state.personas.is_empty() {
        let added: Vec<Persona> = selected
            .into_iter()
            .filter(|p| !state.personas.as_slice().contains(p))
            .take(max_new)
            .collect();
        log::info!(
            "Keeping {} personas and appending {}",
            state.personas.len(),
            added.len()
        );
        update.personas = Some(Accumulate::Append(added));
    } else {
        log::info!("Selected {} personas", selected.len());
        update.personas = Some(Accumulate::Reset(selected));
    }

    update
}

fn describe_constraints(c: &PersonaConstraints) -> String {
    let or_unspecified = |v: &Option<String>| v.clone().unwrap_or_else(|| "unspecified".to_string());
    let list = |v: &[String]| {
        if v.is_empty() {
            "(none)".to_string()
        } else {
            v.join(", ")
        }
    };
    format!(
        "- Primary role: {}\n- Age range: {}\n- Work style: {}\n- Usage frequency: {}\n\
         - Device context: {}\n- Skill level: {}\n- Required keywords: {}\n\
         - Forbidden keywords: {}\n- Notes: {}",
        c.primary_role,
        or_unspecified(&c.age_range),
        or_unspecified(&c.work_style),
        or_unspecified(&c.usage_frequency),
        or_unspecified(&c.device_context),
        or_unspecified(&c.skill_level),
        list(&c.must_include_keywords),
        list(&c.must_exclude_keywords),
        c.notes.as_deref().unwrap_or("(none)")
    )
}

/// `generate_personas`
pub struct GeneratePersonasNode {
    pub generator: Arc<Generator>,
    pub persona_count: usize,
    pub threshold: f64,
    pub max_new: usize,
}

#[async_trait]
impl Node<WorkflowState> for GeneratePersonasNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let constraints: PersonaConstraints = self
            .generator
            .structured(
                &prompts::PERSONA_CONSTRAINTS,
                &[
                    ("problem", state.initial_problem.as_str()),
                    ("persona", state.initial_persona.as_str()),
                    ("solution", state.initial_solution.as_str()),
                    ("log", state.clarification_log.as_str()),
                ],
            )
            .await?;

        let constraints_text = describe_constraints(&constraints);
        let scored: ScoredPersonas = self
            .generator
            .structured(
                &prompts::SCORED_PERSONAS,
                &[
                    ("user_request", state.user_request.as_str()),
                    ("constraints", constraints_text.as_str()),
                ],
            )
            .await?;

        log::debug!("Received {} persona candidates", scored.personas.len());
        let selected = select_personas(scored.personas, self.persona_count, self.threshold);
        Ok(persona_update(state, selected, self.max_new))
    }
}
