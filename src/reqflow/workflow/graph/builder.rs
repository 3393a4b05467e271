// SPDX-License-Identifier: MIT

//! Graph builder - declares nodes and edges, validates on compile

use super::executor::{CompiledGraph, ExecutorConfig};
use super::types::{Edge, GraphState, Node, Target};
use crate::adk::error::WorkflowError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Static definition of a workflow graph
pub struct GraphBuilder<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    order: Vec<String>,
    edges: HashMap<String, Edge<S>>,
    entry: Option<String>,
    errors: Vec<WorkflowError>,
}

impl<S: GraphState> GraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            edges: HashMap::new(),
            entry: None,
            errors: Vec::new(),
        }
    }

    pub fn add_node(mut self, name: &str, node: impl Node<S> + 'static) -> Self {
        if self.nodes.contains_key(name) {
            self.errors
                .push(WorkflowError::DuplicateNode(name.to_string()));
            return self;
        }
        self.nodes.insert(name.to_string(), Arc::new(node));
        self.order.push(name.to_string());
        self
    }

    pub fn set_entry(mut self, name: &str) -> Self {
        self.entry = Some(name.to_string());
        self
    }

    /// Unconditional edge; `to` may be [`END`](super::END)
    pub fn add_edge(self, from: &str, to: &str) -> Self {
        self.insert_edge(from, Edge::Direct(Target::from(to)))
    }

    /// Conditional edge: `router` sees the state after `from` has merged
    /// and must return one of the labels in `branches`.
    pub fn add_conditional_edges<F, I>(self, from: &str, router: F, branches: I) -> Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let branches: BTreeMap<String, Target> = branches
            .into_iter()
            .map(|(label, to)| (label.to_string(), Target::from(to)))
            .collect();
        self.insert_edge(
            from,
            Edge::Conditional {
                router: Arc::new(router),
                branches,
            },
        )
    }

    fn insert_edge(mut self, from: &str, edge: Edge<S>) -> Self {
        if self.edges.contains_key(from) {
            self.errors
                .push(WorkflowError::DuplicateEdge(from.to_string()));
        } else {
            self.edges.insert(from.to_string(), edge);
        }
        self
    }

    /// Validate the definition and produce an executable graph
    pub fn compile(self, config: ExecutorConfig) -> Result<CompiledGraph<S>, WorkflowError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let entry = self.entry.ok_or(WorkflowError::MissingEntry)?;
        if !self.nodes.contains_key(&entry) {
            return Err(WorkflowError::UnknownNode(entry));
        }

        for from in self.edges.keys() {
            if !self.nodes.contains_key(from) {
                return Err(WorkflowError::UnknownNode(from.clone()));
            }
        }

        for name in &self.order {
            let edge = self
                .edges
                .get(name)
                .ok_or_else(|| WorkflowError::MissingEdge(name.clone()))?;

            if let Edge::Conditional { branches, .. } = edge {
                if branches.is_empty() {
                    return Err(WorkflowError::EmptyRouter(name.clone()));
                }
            }

            for target in edge.targets() {
                if let Target::Node(to) = target {
                    if !self.nodes.contains_key(to) {
                        return Err(WorkflowError::UnknownNode(to.clone()));
                    }
                }
            }
        }

        log::debug!(
            "Compiled graph with {} nodes, entry '{}'",
            self.order.len(),
            entry
        );

        Ok(CompiledGraph::new(self.nodes, self.edges, entry, config))
    }
}

impl<S: GraphState> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adk::error::ReqflowError;
    use crate::reqflow::workflow::graph::END;
    use async_trait::async_trait;

    #[derive(Clone, Default)]
    struct Count(u32);

    impl GraphState for Count {
        type Update = u32;
        fn merge(self, update: u32) -> Self {
            Count(self.0 + update)
        }
    }

    struct Inc;

    #[async_trait]
    impl Node<Count> for Inc {
        async fn run(&self, _state: &Count) -> Result<u32, ReqflowError> {
            Ok(1)
        }
    }

    fn compile(builder: GraphBuilder<Count>) -> Result<CompiledGraph<Count>, WorkflowError> {
        builder.compile(ExecutorConfig::default())
    }

    #[test]
    fn test_valid_graph_compiles() {
        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .add_node("b", Inc)
            .set_entry("a")
            .add_edge("a", "b")
            .add_conditional_edges(
                "b",
                |s: &Count| if s.0 > 3 { "done" } else { "again" }.to_string(),
                [("done", END), ("again", "a")],
            );
        assert!(compile(builder).is_ok());
    }

    #[test]
    fn test_missing_entry() {
        let builder = GraphBuilder::<Count>::new().add_node("a", Inc).add_edge("a", END);
        assert_eq!(compile(builder).err(), Some(WorkflowError::MissingEntry));
    }

    #[test]
    fn test_unknown_entry() {
        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .set_entry("z")
            .add_edge("a", END);
        assert_eq!(
            compile(builder).err(),
            Some(WorkflowError::UnknownNode("z".to_string()))
        );
    }

    #[test]
    fn test_edge_to_unknown_node() {
        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .set_entry("a")
            .add_edge("a", "ghost");
        assert_eq!(
            compile(builder).err(),
            Some(WorkflowError::UnknownNode("ghost".to_string()))
        );
    }

    #[test]
    fn test_node_without_edge() {
        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .add_node("b", Inc)
            .set_entry("a")
            .add_edge("a", "b");
        assert_eq!(
            compile(builder).err(),
            Some(WorkflowError::MissingEdge("b".to_string()))
        );
    }

    #[test]
    fn test_duplicate_node_and_edge() {
        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .add_node("a", Inc)
            .set_entry("a")
            .add_edge("a", END);
        assert_eq!(
            compile(builder).err(),
            Some(WorkflowError::DuplicateNode("a".to_string()))
        );

        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .set_entry("a")
            .add_edge("a", END)
            .add_edge("a", END);
        assert_eq!(
            compile(builder).err(),
            Some(WorkflowError::DuplicateEdge("a".to_string()))
        );
    }

    #[test]
    fn test_empty_router() {
        let builder = GraphBuilder::<Count>::new()
            .add_node("a", Inc)
            .set_entry("a")
            .add_conditional_edges("a", |_: &Count| "x".to_string(), []);
        assert_eq!(
            compile(builder).err(),
            Some(WorkflowError::EmptyRouter("a".to_string()))
        );
    }
}
