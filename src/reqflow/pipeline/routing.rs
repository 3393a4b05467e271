// SPDX-License-Identifier: MIT

//! Routers of the requirements pipeline
//!
//! Both routers are pure functions of the merged state. The follow-up
//! router only reads the sufficiency flag and the round counter, which is
//! what bounds human interaction to two rounds per refinement cycle.

use crate::reqflow::types::AssessmentKind;
use crate::reqflow::workflow::state::WorkflowState;

pub const ENOUGH: &str = "enough";
pub const NEED_FOLLOWUPS: &str = "need_followups";
pub const AUTOFILL_AND_FORWARD: &str = "autofill_and_forward";

pub const ALL_TRUE: &str = "all_true";
pub const REFINE_LOOP: &str = "refine_loop";

/// Human follow-up rounds allowed before assumptions are synthesized
pub const MAX_FOLLOWUP_ROUNDS: u32 = 2;

/// How the operator is asked in a follow-up round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowupMode {
    FreeForm,
    YesNo,
}

impl FollowupMode {
    /// Mode for a round that still collects human input
    pub fn for_round(round: u32) -> Self {
        if round == 0 {
            FollowupMode::FreeForm
        } else {
            FollowupMode::YesNo
        }
    }
}

/// Route after `evaluate_information`
pub fn after_evaluation(state: &WorkflowState) -> &'static str {
    if state.is_information_sufficient {
        ENOUGH
    } else if state.followup_round < MAX_FOLLOWUP_ROUNDS {
        NEED_FOLLOWUPS
    } else {
        AUTOFILL_AND_FORWARD
    }
}

/// Route after `assessment_gate`. A missing assessment counts as failing.
pub fn assessment_gate(state: &WorkflowState) -> &'static str {
    let all_pass = AssessmentKind::ALL
        .iter()
        .all(|kind| state.assessment(*kind).map_or(false, |a| a.verdict));
    if all_pass {
        ALL_TRUE
    } else {
        REFINE_LOOP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqflow::types::Assessment;

    fn state(sufficient: bool, round: u32) -> WorkflowState {
        WorkflowState {
            is_information_sufficient: sufficient,
            followup_round: round,
            ..Default::default()
        }
    }

    #[test]
    fn test_sufficiency_wins_regardless_of_round() {
        for round in 0..5 {
            assert_eq!(after_evaluation(&state(true, round)), ENOUGH);
        }
    }

    #[test]
    fn test_round_gates_followups() {
        assert_eq!(after_evaluation(&state(false, 0)), NEED_FOLLOWUPS);
        assert_eq!(after_evaluation(&state(false, 1)), NEED_FOLLOWUPS);
        assert_eq!(after_evaluation(&state(false, 2)), AUTOFILL_AND_FORWARD);
        assert_eq!(after_evaluation(&state(false, 7)), AUTOFILL_AND_FORWARD);
    }

    #[test]
    fn test_followup_mode() {
        assert_eq!(FollowupMode::for_round(0), FollowupMode::FreeForm);
        assert_eq!(FollowupMode::for_round(1), FollowupMode::YesNo);
    }

    fn with_verdicts(
        profitability: Option<bool>,
        feasibility: Option<bool>,
        legal: Option<bool>,
    ) -> WorkflowState {
        let verdict = |v: Option<bool>| v.map(|v| Assessment::new(v, "r"));
        WorkflowState {
            profitability: verdict(profitability),
            feasibility: verdict(feasibility),
            legal: verdict(legal),
            ..Default::default()
        }
    }

    #[test]
    fn test_gate_only_passes_when_all_present_and_true() {
        let options = [None, Some(false), Some(true)];
        for p in options {
            for f in options {
                for l in options {
                    let expected = if p == Some(true) && f == Some(true) && l == Some(true) {
                        ALL_TRUE
                    } else {
                        REFINE_LOOP
                    };
                    assert_eq!(
                        assessment_gate(&with_verdicts(p, f, l)),
                        expected,
                        "{:?} {:?} {:?}",
                        p,
                        f,
                        l
                    );
                }
            }
        }
    }

    #[test]
    fn test_gate_on_fresh_state_refines() {
        assert_eq!(assessment_gate(&WorkflowState::default()), REFINE_LOOP);
    }
}
