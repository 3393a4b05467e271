// SPDX-License-Identifier: MIT

//! Domain entities carried in workflow state and returned by the
//! generation collaborator as structured values.

use crate::adk::generator::StructuredOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An interview subject. Identity is by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Persona {
    /// Persona name
    pub name: String,
    /// Background of the persona
    pub background: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: background.into(),
        }
    }
}

/// One question put to one persona, with the answer given in character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub persona: Persona,
    pub question: String,
    pub answer: String,
}

/// Whether the gathered information is enough to write requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationResult {
    /// Reason for the judgement
    pub reason: String,
    /// True when the information is sufficient
    pub is_sufficient: bool,
    /// Missing information items
    #[serde(default)]
    pub gaps: Vec<String>,
    /// Concrete questions that would close the gaps
    #[serde(default)]
    pub followup_questions: Vec<String>,
}

impl StructuredOutput for EvaluationResult {}

/// External-environment analysis of the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExternalEnvironmentAnalysis {
    /// Market and customer analysis
    pub customer_analysis: String,
    /// Competitor analysis
    pub competitor_analysis: String,
    /// Analysis of the project itself
    pub company_analysis: String,
    /// Political, economic, social and technological factors
    pub pest_analysis: String,
    /// Summary and strategic recommendation
    pub summary_and_strategy: String,
}

impl StructuredOutput for ExternalEnvironmentAnalysis {}

impl ExternalEnvironmentAnalysis {
    /// Flattened text for prompts
    pub fn to_prompt_text(&self) -> String {
        format!(
            "Customers: {}\nCompetitors: {}\nCompany: {}\nPEST: {}\nSummary: {}",
            self.customer_analysis,
            self.competitor_analysis,
            self.company_analysis,
            self.pest_analysis,
            self.summary_and_strategy
        )
    }
}

/// A binary quality verdict with its reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Assessment {
    /// True when the plan passes this check
    pub verdict: bool,
    /// Reason for the verdict
    pub reason: String,
}

impl StructuredOutput for Assessment {}

impl Assessment {
    pub fn new(verdict: bool, reason: impl Into<String>) -> Self {
        Self {
            verdict,
            reason: reason.into(),
        }
    }
}

/// The three independent quality checks of the refinement loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssessmentKind {
    Profitability,
    Feasibility,
    Legal,
}

impl AssessmentKind {
    pub const ALL: [AssessmentKind; 3] = [
        AssessmentKind::Profitability,
        AssessmentKind::Feasibility,
        AssessmentKind::Legal,
    ];

    /// Graph node name of the assessor
    pub fn node_name(self) -> &'static str {
        match self {
            AssessmentKind::Profitability => "assess_profitability",
            AssessmentKind::Feasibility => "assess_feasibility",
            AssessmentKind::Legal => "assess_legal",
        }
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssessmentKind::Profitability => "profitability",
            AssessmentKind::Feasibility => "feasibility",
            AssessmentKind::Legal => "legal",
        };
        f.write_str(s)
    }
}

/// Constraints the generated personas must satisfy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonaConstraints {
    /// Central role of the target user
    pub primary_role: String,
    /// Age band
    #[serde(default)]
    pub age_range: Option<String>,
    /// Work style and time constraints
    #[serde(default)]
    pub work_style: Option<String>,
    /// How often the product would be used
    #[serde(default)]
    pub usage_frequency: Option<String>,
    /// Main device and environment
    #[serde(default)]
    pub device_context: Option<String>,
    /// IT or domain skill level
    #[serde(default)]
    pub skill_level: Option<String>,
    /// Keywords every persona must reflect
    #[serde(default)]
    pub must_include_keywords: Vec<String>,
    /// Keywords no persona may reflect
    #[serde(default)]
    pub must_exclude_keywords: Vec<String>,
    /// Other notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl StructuredOutput for PersonaConstraints {
    fn validate(&self) -> Result<(), String> {
        if self.primary_role.trim().is_empty() {
            return Err("primary_role is empty".to_string());
        }
        Ok(())
    }
}

/// A candidate persona with its fit score against the constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredPersona {
    pub name: String,
    pub background: String,
    /// Fit to the constraints, 0.0 to 1.0
    pub fit_score: f64,
    /// Why this persona fits
    #[serde(default)]
    pub rationale: String,
}

impl ScoredPersona {
    pub fn into_persona(self) -> Persona {
        Persona {
            name: self.name,
            background: self.background,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredPersonas {
    #[serde(default)]
    pub personas: Vec<ScoredPersona>,
}

impl StructuredOutput for ScoredPersonas {
    fn validate(&self) -> Result<(), String> {
        if self.personas.is_empty() {
            return Err("no persona candidates returned".to_string());
        }
        match self
            .personas
            .iter()
            .find(|p| !(0.0..=1.0).contains(&p.fit_score))
        {
            Some(p) => Err(format!(
                "fit_score {} for '{}' is outside [0, 1]",
                p.fit_score, p.name
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scored_personas_validation() {
        let ok: ScoredPersonas = serde_json::from_value(json!({
            "personas": [{"name": "A", "background": "b", "fit_score": 1.0, "rationale": "r"}]
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: ScoredPersonas = serde_json::from_value(json!({
            "personas": [{"name": "A", "background": "b", "fit_score": 1.2}]
        }))
        .unwrap();
        assert!(bad.validate().unwrap_err().contains("'A'"));
    }

    #[test]
    fn test_scored_personas_rejects_empty_list() {
        let empty: ScoredPersonas = serde_json::from_value(json!({"personas": []})).unwrap();
        assert!(empty.validate().is_err());

        let missing: ScoredPersonas = serde_json::from_value(json!({})).unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_evaluation_defaults_lists() {
        let eval: EvaluationResult =
            serde_json::from_value(json!({"reason": "ok", "is_sufficient": true})).unwrap();
        assert!(eval.gaps.is_empty());
        assert!(eval.followup_questions.is_empty());
    }

    #[test]
    fn test_constraints_require_role() {
        let c: PersonaConstraints = serde_json::from_value(json!({"primary_role": " "})).unwrap();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_assessment_kind_names() {
        assert_eq!(AssessmentKind::Legal.to_string(), "legal");
        assert_eq!(
            AssessmentKind::Profitability.node_name(),
            "assess_profitability"
        );
    }
}
