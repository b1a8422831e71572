//! Ergonomic programmatic graph construction, mainly for tests and callers
//! that build a [`Graph`] in Rust rather than decoding it from wire JSON.
//!
//! This is a convenience wrapper only: it catches a caller mistake (adding
//! the same node id twice) immediately, at build time. It performs none of
//! the validator's own structural or semantic checks (I1–I10) — those
//! still run, as usual, when the resulting graph is passed to
//! [`crate::validator::validate`].

use crate::error::GraphBuilderError;
use crate::types::{Edge, Graph, Node, NodeConfig};
use indexmap::IndexSet;

#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    seen_ids: IndexSet<String>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    pub fn node(
        mut self,
        id: impl Into<String>,
        ty: impl Into<String>,
        config: NodeConfig,
    ) -> Result<Self, GraphBuilderError> {
        let id = id.into();
        if !self.seen_ids.insert(id.clone()) {
            return Err(GraphBuilderError::DuplicateNodeId(id));
        }
        self.nodes.push(Node {
            id,
            type_: ty.into(),
            config,
        });
        Ok(self)
    }

    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(Edge {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    pub fn build(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_simple_linear_graph() {
        let graph = GraphBuilder::new()
            .node("user", "User", NodeConfig::default())
            .unwrap()
            .node("server", "Server", NodeConfig::default())
            .unwrap()
            .edge("user", "server")
            .build();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let err = GraphBuilder::new()
            .node("user", "User", NodeConfig::default())
            .unwrap()
            .node("user", "Server", NodeConfig::default())
            .unwrap_err();
        assert_eq!(err, GraphBuilderError::DuplicateNodeId("user".to_string()));
    }
}
