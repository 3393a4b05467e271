// SPDX-License-Identifier: MIT

//! Interviews and the follow-up loop
//!
//! `conduct_interviews` and `evaluate_information` run once per pass;
//! `ask_followups` and `autofill_assumptions` are the two insufficiency
//! outcomes the evaluation router chooses between.

use crate::adk::error::ReqflowError;
use crate::adk::generator::Generator;
use crate::adk::input::InputCollector;
use crate::reqflow::pipeline::routing::FollowupMode;
use crate::reqflow::pipeline::{bullets, format_interviews, or_none, prompts};
use crate::reqflow::types::{EvaluationResult, Interview, Persona};
use crate::reqflow::workflow::graph::Node;
use crate::reqflow::workflow::state::{Accumulate, StateUpdate, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// Used when the collaborator returns fewer questions than requested
pub const FALLBACK_QUESTION: &str = "What is your biggest concern about this project?";

/// Answer recorded when the operator leaves a follow-up blank
pub const NO_ANSWER: &str = "(no answer)";

/// Split a reply into one item per non-empty line, stripping bullets
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate or pad to exactly `count` questions
pub fn fit_questions(mut questions: Vec<String>, count: usize) -> Vec<String> {
    questions.truncate(count);
    while questions.len() < count {
        questions.push(FALLBACK_QUESTION.to_string());
    }
    questions
}

/// One interview per (persona, question) pair across the whole log
fn already_asked(
    recorded: &[Interview],
    pending: &[Interview],
    persona: &Persona,
    question: &str,
) -> bool {
    recorded
        .iter()
        .chain(pending)
        .any(|i| i.persona == *persona && i.question == question)
}

/// `conduct_interviews`
pub struct ConductInterviewsNode {
    pub generator: Arc<Generator>,
    pub questions_per_persona: usize,
}

#[async_trait]
impl Node<WorkflowState> for ConductInterviewsNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        log::info!(
            "Interviewing {} personas (cycle {})",
            state.personas.len(),
            state.iteration + 1
        );

        let count = self.questions_per_persona.to_string();
        let mut interviews = Vec::new();

        for persona in &state.personas {
            let raw = self
                .generator
                .text(
                    &prompts::INTERVIEW_QUESTIONS,
                    &[
                        ("count", count.as_str()),
                        ("user_request", state.user_request.as_str()),
                        ("persona_name", persona.name.as_str()),
                        ("persona_background", persona.background.as_str()),
                    ],
                )
                .await?;

            for question in fit_questions(parse_lines(&raw), self.questions_per_persona) {
                if already_asked(state.interviews.as_slice(), &interviews, persona, &question) {
                    log::debug!("Skipping repeated question for {}: {}", persona.name, question);
                    continue;
                }
                let answer = self
                    .generator
                    .text(
                        &prompts::INTERVIEW_ANSWER,
                        &[
                            ("persona_name", persona.name.as_str()),
                            ("persona_background", persona.background.as_str()),
                            ("question", question.as_str()),
                        ],
                    )
                    .await?;

                interviews.push(Interview {
                    persona: persona.clone(),
                    question,
                    answer,
                });
            }
        }

        Ok(StateUpdate {
            interviews: Some(Accumulate::Append(interviews)),
            ..Default::default()
        })
    }
}

/// `evaluate_information`
pub struct EvaluateNode {
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for EvaluateNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let interviews = format_interviews(state.interviews.as_slice());
        let evaluation: EvaluationResult = self
            .generator
            .structured(
                &prompts::EVALUATE_INFORMATION,
                &[
                    ("user_request", state.user_request.as_str()),
                    ("interviews", interviews.as_str()),
                ],
            )
            .await?;

        if evaluation.is_sufficient {
            log::info!("Information is sufficient: {}", evaluation.reason);
        } else {
            log::info!(
                "Information is insufficient ({} gaps, {} follow-up questions)",
                evaluation.gaps.len(),
                evaluation.followup_questions.len()
            );
        }

        Ok(StateUpdate {
            is_information_sufficient: Some(evaluation.is_sufficient),
            iteration: Some(state.iteration + 1),
            evaluation: Some(evaluation),
            ..Default::default()
        })
    }
}

/// `ask_followups` - human collection, free form in round 0, yes/no after
pub struct AskFollowupsNode {
    pub generator: Arc<Generator>,
    pub collector: Arc<dyn InputCollector>,
}

impl AskFollowupsNode {
    async fn to_yes_no(&self, questions: &[String]) -> Result<Vec<String>, ReqflowError> {
        let listed = bullets(questions);
        let raw = self
            .generator
            .text(&prompts::YES_NO_QUESTIONS, &[("questions", listed.as_str())])
            .await?;
        let converted = parse_lines(&raw);
        if converted.is_empty() {
            log::warn!("Yes/no conversion returned nothing; asking the original questions");
            return Ok(questions.to_vec());
        }
        Ok(converted)
    }
}

#[async_trait]
impl Node<WorkflowState> for AskFollowupsNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let round = state.followup_round;
        let mode = FollowupMode::for_round(round);
        let mut update = StateUpdate {
            followup_round: Some(round + 1),
            ..Default::default()
        };

        let (gaps, questions) = match &state.evaluation {
            Some(e) => (e.gaps.as_slice(), e.followup_questions.clone()),
            None => (&[][..], Vec::new()),
        };
        if questions.is_empty() {
            log::info!("Follow-up round {}: no questions to ask", round + 1);
            return Ok(update);
        }

        self.collector
            .show(&format!("Missing information:\n{}", bullets(gaps)));

        let (questions, hint, header) = match mode {
            FollowupMode::FreeForm => (
                questions,
                "Answer (\"don't know\" is fine; finish with an empty line):",
                "## Follow-up round 1 (free form)",
            ),
            FollowupMode::YesNo => {
                self.collector
                    .show("This round, please answer yes or no, with an optional comment.");
                (
                    self.to_yes_no(&questions).await?,
                    "Answer yes or no (finish with an empty line):",
                    "## Follow-up round 2 (yes/no)",
                )
            }
        };

        let mut collected = Vec::with_capacity(questions.len());
        for (i, question) in questions.iter().enumerate() {
            let n = i + 1;
            self.collector.show(&format!("Q{}: {}", n, question));
            self.collector.show(hint);
            let answer = self.collector.read_block()?;
            let answer = match answer.trim() {
                "" => NO_ANSWER,
                a => a,
            };
            collected.push(format!("Q{}: {}\nA{}: {}", n, question, n, answer));
        }

        log::info!(
            "Follow-up round {}: collected {} answers",
            round + 1,
            collected.len()
        );
        update.clarification_log = Some(format!(
            "{}\n\n{}\n{}",
            state.clarification_log,
            header,
            collected.join("\n\n")
        ));
        Ok(update)
    }
}

/// `autofill_assumptions` - resolves the remaining gaps without the operator
pub struct AutofillNode {
    pub generator: Arc<Generator>,
}

#[async_trait]
impl Node<WorkflowState> for AutofillNode {
    async fn run(&self, state: &WorkflowState) -> Result<StateUpdate, ReqflowError> {
        let notes: Vec<String> = state
            .interviews
            .iter()
            .map(|i| format!("{}: {}", i.persona.name, i.answer))
            .collect();
        let gaps = state
            .evaluation
            .as_ref()
            .map(|e| e.gaps.clone())
            .unwrap_or_default();

        let notes = or_none(bullets(&notes));
        let gaps = or_none(bullets(&gaps));
        let assumptions = self
            .generator
            .text(
                &prompts::ASSUMPTIONS,
                &[
                    ("user_request", state.user_request.as_str()),
                    ("interviews", notes.as_str()),
                    ("gaps", gaps.as_str()),
                ],
            )
            .await?;

        log::info!("Synthesized assumptions after {} follow-up rounds", state.followup_round);
        Ok(StateUpdate {
            clarification_log: Some(format!(
                "{}\n\n## Synthesized assumptions\n{}",
                state.clarification_log, assumptions
            )),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_strips_bullets() {
        let raw = "- first?\n\n• second?\n  * third?  \n";
        assert_eq!(parse_lines(raw), vec!["first?", "second?", "third?"]);
    }

    #[test]
    fn test_fit_questions_pads_and_truncates() {
        let padded = fit_questions(vec!["a".to_string()], 3);
        assert_eq!(padded, vec!["a", FALLBACK_QUESTION, FALLBACK_QUESTION]);

        let cut = fit_questions(
            vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()],
            3,
        );
        assert_eq!(cut, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_already_asked_matches_persona_and_question() {
        let aiko = Persona::new("Aiko", "nurse");
        let ben = Persona::new("Ben", "clerk");
        let recorded = vec![Interview {
            persona: aiko.clone(),
            question: "When?".to_string(),
            answer: "Nights.".to_string(),
        }];
        let pending = vec![Interview {
            persona: ben.clone(),
            question: "Why?".to_string(),
            answer: "Speed.".to_string(),
        }];

        assert!(already_asked(&recorded, &pending, &aiko, "When?"));
        assert!(already_asked(&recorded, &pending, &ben, "Why?"));
        assert!(!already_asked(&recorded, &pending, &ben, "When?"));
        assert!(!already_asked(&recorded, &pending, &aiko, "Why?"));
    }
}
