// SPDX-License-Identifier: MIT

//! Requirements workflow: the generic graph engine and the pipeline built on it

pub mod config;
pub mod pipeline;
pub mod types;
pub mod workflow;
