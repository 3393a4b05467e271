// SPDX-License-Identifier: MIT

//! Prompt templates for the requirements pipeline

use crate::adk::prompt::PromptTemplate;
use once_cell::sync::Lazy;

pub static CLARIFICATION: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You write a short alignment questionnaire that removes ambiguity between the \
             operator's initial inputs and everything generated later. Keep questions generic, \
             mostly multiple choice with minimal free text, and allow \"don't know\". Start by \
             echoing your understanding in two sentences, then cover goals, scope in/out, \
             priorities, definition of done, constraints, inputs and outputs, user context, \
             ambiguous terms and open risks. Output Markdown.",
        )
        .user("Problem: {problem}\nTarget persona: {persona}\nProposed solution: {solution}")
});

pub static SUMMARIZE_REQUEST: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You are an experienced project manager. Read the initial inputs and the \
             clarification log and write a one-paragraph project summary for the development team.",
        )
        .user(
            "## Inputs\n- Problem: {problem}\n- Target persona: {persona}\n- Solution: {solution}\n\n\
             ## Clarification log\n{log}\n\n## Project summary:",
        )
});

pub static SUMMARY_FROM_REQUIREMENTS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You are an editor. Summarize the requirements document in one neutral paragraph \
             stating the goal, the main user value and the MVP scope.",
        )
        .user("Requirements document:\n{requirements}\n\n---\nOne-paragraph summary:")
});

pub static PERSONA_CONSTRAINTS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You audit requirement consistency. Extract the constraints generated personas must \
             satisfy from the initial inputs and the clarification log. Fill obvious omissions \
             with common sense.",
        )
        .user(
            "## Inputs\n- Problem: {problem}\n- Persona: {persona}\n- Solution: {solution}\n\n\
             ## Clarification log\n{log}\n\n\
             Extract role, age band, usage context, frequency, skill level, conditions that make a \
             persona unsuitable, and required/forbidden keywords.",
        )
});

pub static SCORED_PERSONAS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You create personas for user interviews. Produce 8 to 10 distinct candidates that \
             satisfy the constraints and give each a fit_score between 0 and 1 covering role fit, \
             context match, constraint compliance and differentiation. Avoid duplicate profiles.",
        )
        .user(
            "## Project summary\n{user_request}\n\n## Constraints\n{constraints}\n\n\
             The first candidate is the representative persona with the best fit. Give each \
             candidate a fit_score and a one or two sentence rationale. Never produce a candidate \
             matching a forbidden keyword.",
        )
});

pub static INTERVIEW_QUESTIONS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You design UX research questions. Write {count} concrete questions for this persona \
             that draw out real needs, are quick to answer and help reach agreement. One question \
             per line.",
        )
        .user(
            "Project summary:\n{user_request}\n\nPersona:\n{persona_name} - {persona_background}\n\n\
             Output only the questions.",
        )
});

pub static INTERVIEW_ANSWER: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "Answer as the persona below, in the first person, in two or three natural sentences \
             with a concrete example.",
        )
        .user("Persona: {persona_name} - {persona_background}\nQuestion: {question}\nAnswer:")
});

pub static EVALUATE_INFORMATION: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You judge whether the gathered information is enough to write a complete \
             requirements document for a small self-funded project. Minor gaps can be filled by \
             assumptions; only fatal gaps (no legal stance, no monetization plan, undefined main \
             inputs or outputs) make it insufficient. When insufficient, list the gaps and short, \
             answerable follow-up questions.",
        )
        .user(
            "Project summary: {user_request}\n\nInterview results:\n{interviews}\n\n\
             Evaluate sufficiency.",
        )
});

pub static YES_NO_QUESTIONS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You rewrite free-form follow-up questions so they can be answered yes or no. One \
             sentence each, phrased so that yes is the default hypothesis. One question per line.",
        )
        .user("Questions:\n{questions}\n\nRewritten:")
});

pub static ASSUMPTIONS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You are the PM of a small project. Fill each missing item with a reasonable, \
             conservative assumption. For each item give the decision, its basis and how to \
             re-check it later, one line each.",
        )
        .user(
            "## Project summary\n{user_request}\n\n## Interview notes\n{interviews}\n\n\
             ## Missing items\n{gaps}\n\n## Assumptions:",
        )
});

pub static REQUIREMENTS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You are a senior product manager writing an integrated requirements document for a \
             small project. Cover purpose, target users, user stories, functional and \
             non-functional requirements, MVP scope, out of scope, monetization, risks and \
             milestones. Mark assumptions explicitly. Output Markdown.",
        )
        .user(
            "## Project summary\n{user_request}\n\n## Clarification log\n{log}\n\n\
             ## Interviews\n{interviews}\n\nWrite the requirements document.",
        )
});

pub static ENVIRONMENT: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You are a strategy consultant. Analyze the external environment of the project: \
             customers and market, competitors and substitutes, the project's own strengths and \
             weaknesses, PEST factors, and a short strategic recommendation.",
        )
        .user("Requirements document:\n{requirements}")
});

pub static PROFITABILITY: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You assess whether the plan can plausibly cover its running costs and earn revenue. \
             Answer with a verdict and a concise reason.",
        )
        .user("Requirements:\n{requirements}\n\nExternal environment:\n{environment}")
});

pub static FEASIBILITY: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You assess whether a single developer or a small team can build and operate the MVP \
             with the described scope and resources. Answer with a verdict and a concise reason.",
        )
        .user("Requirements:\n{requirements}\n\nExternal environment:\n{environment}")
});

pub static LEGAL: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You assess legal and compliance risk: personal data, terms of service of external \
             services, intellectual property and regulated domains. Answer with a verdict and a \
             concise reason.",
        )
        .user("Requirements:\n{requirements}\n\nExternal environment:\n{environment}")
});

pub static IMPROVE_REQUIREMENTS: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You revise a requirements document so that it resolves the listed assessment \
             failures while keeping what already works. Output the full revised document in \
             Markdown.",
        )
        .user(
            "## Current requirements\n{requirements}\n\n## External environment\n{environment}\n\n\
             ## Failed checks\n{failures}\n\nRevised requirements document:",
        )
});

pub static PITCH: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new()
        .system(
            "You write a one-page project pitch: the problem, who has it, the solution, why now, \
             the MVP and the next steps. Persuasive but honest. Output Markdown.",
        )
        .user("## Project summary\n{user_request}\n\n## Interviews\n{interviews}")
});
