// SPDX-License-Identifier: MIT

//! Graph type definitions
//!
//! This module defines the node, edge and routing types the executor runs.

use crate::adk::error::ReqflowError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name used for the terminal marker in edge declarations
pub const END: &str = "__end__";

/// State a graph can thread through its nodes
pub trait GraphState: Send + Sync + 'static {
    /// Partial update produced by a node
    type Update: Send;

    /// Combine a partial update into the state
    fn merge(self, update: Self::Update) -> Self;

    /// Field names an update writes, for logging
    fn update_fields(_update: &Self::Update) -> Vec<&'static str> {
        Vec::new()
    }
}

/// A unit of work: reads a snapshot, returns a partial update
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync {
    async fn run(&self, state: &S) -> Result<S::Update, ReqflowError>;
}

/// Pure routing function returning one of its declared labels
pub type RouteFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Where an edge leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node(String),
    End,
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Node(n) => n,
            Target::End => END,
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        if name == END {
            Target::End
        } else {
            Target::Node(name.to_string())
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outgoing edge of a node
pub enum Edge<S> {
    /// Unconditional successor
    Direct(Target),
    /// Router over the just-merged state, with its declared labels
    Conditional {
        router: RouteFn<S>,
        branches: BTreeMap<String, Target>,
    },
}

impl<S> Edge<S> {
    /// Every target this edge can lead to
    pub fn targets(&self) -> Vec<&Target> {
        match self {
            Edge::Direct(t) => vec![t],
            Edge::Conditional { branches, .. } => branches.values().collect(),
        }
    }
}

impl<S> fmt::Debug for Edge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Direct(t) => f.debug_tuple("Direct").field(t).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("branches", branches)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_name() {
        assert_eq!(Target::from(END), Target::End);
        assert_eq!(Target::from("a"), Target::Node("a".to_string()));
        assert_eq!(Target::End.to_string(), END);
    }

    #[test]
    fn test_edge_targets() {
        let edge: Edge<()> = Edge::Direct(Target::from("b"));
        assert_eq!(edge.targets(), vec![&Target::Node("b".to_string())]);

        let mut branches = BTreeMap::new();
        branches.insert("done".to_string(), Target::End);
        branches.insert("again".to_string(), Target::from("a"));
        let edge: Edge<()> = Edge::Conditional {
            router: Arc::new(|_| "done".to_string()),
            branches,
        };
        assert_eq!(edge.targets().len(), 2);
    }
}
