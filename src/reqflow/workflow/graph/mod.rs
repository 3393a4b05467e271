// SPDX-License-Identifier: MIT

//! Graph-based workflow execution
//!
//! This module provides the graph definition (nodes, unconditional and
//! conditional edges, one entry, one END marker) and the sequential
//! executor that drives it.

mod builder;
pub mod executor;
pub mod types;

pub use builder::GraphBuilder;
pub use executor::{CompiledGraph, ExecutorConfig, RunReport, DEFAULT_MAX_STEPS};
pub use types::{Edge, GraphState, Node, RouteFn, Target, END};
