// SPDX-License-Identifier: MIT

//! State schema definitions

use crate::adk::error::WorkflowError;
use serde::{Deserialize, Serialize};

/// How a partial update combines with the current value of a field
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Replace the value (default)
    #[default]
    Replace,
    /// Concatenate onto the existing sequence
    Append,
}

/// Definition of a single state field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateFieldDef {
    pub name: &'static str,
    pub policy: MergePolicy,
}

const fn replace(name: &'static str) -> StateFieldDef {
    StateFieldDef {
        name,
        policy: MergePolicy::Replace,
    }
}

const fn append(name: &'static str) -> StateFieldDef {
    StateFieldDef {
        name,
        policy: MergePolicy::Append,
    }
}

const FIELDS: &[StateFieldDef] = &[
    replace("initial_problem"),
    replace("initial_persona"),
    replace("initial_solution"),
    replace("clarification_log"),
    replace("user_request"),
    replace("requirements_doc"),
    replace("pitch_document"),
    replace("iteration"),
    replace("followup_round"),
    replace("refinement_round"),
    replace("is_information_sufficient"),
    replace("augment_personas"),
    replace("evaluation"),
    replace("environment_analysis"),
    replace("profitability"),
    replace("feasibility"),
    replace("legal"),
    append("personas"),
    append("interviews"),
];

/// The declared fields of [`WorkflowState`](super::WorkflowState)
///
/// This is the declared mirror of the typed merge in
/// `WorkflowState::merge`, which applies each policy directly. It is read
/// when validating JSON partial updates and kept in sync with the typed
/// fields by the store tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateSchema;

impl StateSchema {
    pub fn fields() -> &'static [StateFieldDef] {
        FIELDS
    }

    /// Merge policy of a declared field
    pub fn policy(name: &str) -> Result<MergePolicy, WorkflowError> {
        FIELDS
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.policy)
            .ok_or_else(|| WorkflowError::UnknownField(name.to_string()))
    }

    pub fn is_declared(name: &str) -> bool {
        FIELDS.iter().any(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_fields() {
        let appends: Vec<_> = StateSchema::fields()
            .iter()
            .filter(|f| f.policy == MergePolicy::Append)
            .map(|f| f.name)
            .collect();
        assert_eq!(appends, vec!["personas", "interviews"]);
    }

    #[test]
    fn test_policy_lookup() {
        assert_eq!(StateSchema::policy("iteration"), Ok(MergePolicy::Replace));
        assert_eq!(StateSchema::policy("interviews"), Ok(MergePolicy::Append));
        assert_eq!(
            StateSchema::policy("mood"),
            Err(WorkflowError::UnknownField("mood".to_string()))
        );
    }

    #[test]
    fn test_no_duplicate_fields() {
        let fields = StateSchema::fields();
        for (i, f) in fields.iter().enumerate() {
            assert!(
                fields[i + 1..].iter().all(|g| g.name != f.name),
                "duplicate field {}",
                f.name
            );
        }
    }

    #[test]
    fn test_policy_default() {
        assert_eq!(MergePolicy::default(), MergePolicy::Replace);
    }
}
