// SPDX-License-Identifier: MIT

//! Graph workflow executor
//!
//! Runs one node at a time: invoke on a read-only snapshot, merge the
//! partial update, then resolve the successor through the node's edge.
//! The step ceiling is a safety net against a broken router. It sits above
//! every counter-bounded loop in a well-formed graph.

use super::types::{Edge, GraphState, Node, Target};
use crate::adk::error::{ReqflowError, WorkflowError};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Default global step ceiling
pub const DEFAULT_MAX_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum node invocations before the run is aborted
    pub max_steps: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct RunReport<S> {
    pub run_id: Uuid,
    pub state: S,
    /// Executed node names, in order
    pub trace: Vec<String>,
}

impl<S> RunReport<S> {
    pub fn steps(&self) -> usize {
        self.trace.len()
    }
}

/// Validated, executable graph
pub struct CompiledGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: HashMap<String, Edge<S>>,
    entry: String,
    config: ExecutorConfig,
}

impl<S: GraphState> CompiledGraph<S> {
    pub(crate) fn new(
        nodes: HashMap<String, Arc<dyn Node<S>>>,
        edges: HashMap<String, Edge<S>>,
        entry: String,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            nodes,
            edges,
            entry,
            config,
        }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run from the entry node to END and return the final state
    pub async fn invoke(&self, state: S) -> Result<S, ReqflowError> {
        Ok(self.run(state).await?.state)
    }

    /// Run from the entry node to END, keeping the executed-node trace
    pub async fn run(&self, initial: S) -> Result<RunReport<S>, ReqflowError> {
        let run_id = Uuid::new_v4();
        let mut state = initial;
        let mut trace: Vec<String> = Vec::new();
        let mut current = Target::Node(self.entry.clone());

        log::info!(
            "[{}] Starting graph at '{}' (max {} steps)",
            run_id,
            self.entry,
            self.config.max_steps
        );

        while let Target::Node(name) = current {
            if trace.len() >= self.config.max_steps {
                log::error!(
                    "[{}] Graph did not terminate within {} steps (last node '{}')",
                    run_id,
                    self.config.max_steps,
                    name
                );
                return Err(WorkflowError::StepLimitExceeded {
                    limit: self.config.max_steps,
                }
                .into());
            }

            let node = self
                .nodes
                .get(&name)
                .ok_or_else(|| WorkflowError::UnknownNode(name.clone()))?;

            log::info!("[{}] Step {}: executing node {}", run_id, trace.len() + 1, name);

            let update = match node.run(&state).await {
                Ok(update) => update,
                Err(e) => {
                    log::error!("[{}] Node {} failed: {}", run_id, name, e);
                    return Err(ReqflowError::in_node(name, e));
                }
            };

            log::debug!(
                "[{}] Node {} wrote {:?}",
                run_id,
                name,
                S::update_fields(&update)
            );
            state = state.merge(update);

            current = self.next_target(&name, &state)?;
            log::info!("[{}] Node {} completed -> {}", run_id, name, current);
            trace.push(name);
        }

        log::info!("[{}] Reached end after {} steps", run_id, trace.len());
        Ok(RunReport {
            run_id,
            state,
            trace,
        })
    }

    /// Resolve the successor of `node` against the just-merged state
    fn next_target(&self, node: &str, state: &S) -> Result<Target, WorkflowError> {
        match self.edges.get(node) {
            Some(Edge::Direct(target)) => Ok(target.clone()),
            Some(Edge::Conditional { router, branches }) => {
                let label = router(state);
                branches.get(&label).cloned().ok_or_else(|| {
                    log::error!("Router after '{}' returned undeclared label '{}'", node, label);
                    WorkflowError::UnknownRoute {
                        node: node.to_string(),
                        label,
                    }
                })
            }
            None => Err(WorkflowError::MissingEdge(node.to_string())),
        }
    }
}
