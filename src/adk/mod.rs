// SPDX-License-Identifier: MIT

//! Collaborator plumbing: model providers, prompts, structured output,
//! human input and the shared error types.

pub mod error;
pub mod generator;
pub mod input;
pub mod model;
pub mod prompt;
