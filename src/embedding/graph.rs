//! Exported graph structure.
//!
//! Wrapper around `petgraph::DiGraph` with element-id ↔ NodeIndex mapping.
//! This is the intermediate representation between the full-graph edge export
//! and the training strategies; node payloads are the store's opaque element
//! ids.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Directed graph of store element ids, built from a full edge scan.
#[derive(Debug, Clone, Default)]
pub struct ExportedGraph {
    /// The underlying directed graph
    pub graph: DiGraph<String, ()>,
    /// Mapping from element id to petgraph NodeIndex
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl ExportedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.id_to_index.insert(id.to_string(), idx);
        idx
    }

    /// Add a directed edge, creating endpoints on first sight.
    pub fn add_edge(&mut self, src: &str, dst: &str) {
        let s = self.ensure_node(src);
        let d = self.ensure_node(dst);
        self.graph.add_edge(s, d, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Out-neighbor lists indexed by `NodeIndex::index()`.
    pub fn out_adjacency(&self) -> Vec<Vec<u32>> {
        self.adjacency(Direction::Outgoing)
    }

    /// In-neighbor lists indexed by `NodeIndex::index()`.
    pub fn in_adjacency(&self) -> Vec<Vec<u32>> {
        self.adjacency(Direction::Incoming)
    }

    fn adjacency(&self, direction: Direction) -> Vec<Vec<u32>> {
        let mut adjacency = vec![Vec::new(); self.graph.node_count()];
        for idx in self.graph.node_indices() {
            adjacency[idx.index()] = self
                .graph
                .neighbors_directed(idx, direction)
                .map(|n| n.index() as u32)
                .collect();
        }
        adjacency
    }
}
