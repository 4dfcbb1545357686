use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tangle_core::{ComponentId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to parse graph JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("edge ({0}, {1}) references a node outside 0..{2}")]
    EdgeOutOfRange(u32, u32, u32),
}

/// Undirected graph model that layout operates on.
///
/// Nodes are dense `NodeId`s allocated in insertion order. The store itself
/// is not shared with the layout worker; algorithms only ever see immutable
/// [`ComponentView`] snapshots taken from it.
#[derive(Debug, Default)]
pub struct GraphStore {
    adjacency: Vec<Vec<NodeId>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `count` isolated nodes.
    pub fn with_nodes(count: u32) -> Self {
        Self {
            adjacency: vec![Vec::new(); count as usize],
        }
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.adjacency.len() as u32);
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an undirected edge. Self-loops and duplicates are ignored.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        if !self.adjacency[a.index()].contains(&b) {
            self.adjacency[a.index()].push(b);
            self.adjacency[b.index()].push(a);
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.adjacency.len() as u32).map(NodeId)
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency[node.index()]
    }

    /// Split the graph into connected components.
    ///
    /// Components are discovered by BFS in node order, so `ComponentId`s are
    /// deterministic for a given store: the component containing the
    /// lowest-numbered unvisited node gets the next id.
    pub fn components(&self) -> Vec<Arc<ComponentView>> {
        let mut visited = vec![false; self.node_count()];
        let mut views = Vec::new();

        for start in self.nodes() {
            if visited[start.index()] {
                continue;
            }

            let mut members = Vec::new();
            let mut queue = std::collections::VecDeque::new();
            visited[start.index()] = true;
            queue.push_back(start);

            while let Some(node) = queue.pop_front() {
                members.push(node);
                for &next in self.neighbors(node) {
                    if !visited[next.index()] {
                        visited[next.index()] = true;
                        queue.push_back(next);
                    }
                }
            }

            members.sort();
            let neighbors = members
                .iter()
                .map(|&n| (n, self.adjacency[n.index()].clone()))
                .collect();

            views.push(Arc::new(ComponentView {
                id: ComponentId(views.len() as u32),
                nodes: members,
                neighbors,
            }));
        }

        views
    }

    /// Parse a graph from its JSON description:
    /// `{ "nodes": 8, "edges": [[0, 1], [1, 2]] }`.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        #[derive(Deserialize)]
        struct GraphFile {
            nodes: u32,
            #[serde(default)]
            edges: Vec<(u32, u32)>,
        }

        let file: GraphFile = serde_json::from_str(json)?;
        let mut store = GraphStore::with_nodes(file.nodes);

        for (a, b) in file.edges {
            if a >= file.nodes || b >= file.nodes {
                return Err(GraphError::EdgeOutOfRange(a, b, file.nodes));
            }
            store.add_edge(NodeId(a), NodeId(b));
        }

        Ok(store)
    }
}

/// Read-only view of one connected component: its node ids and their
/// adjacency. Algorithms hold these as `Arc` snapshots, so a view stays
/// valid for the lifetime of the algorithm bound to it.
#[derive(Debug)]
pub struct ComponentView {
    id: ComponentId,
    nodes: Vec<NodeId>,
    neighbors: HashMap<NodeId, Vec<NodeId>>,
}

impl ComponentView {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.neighbors.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_of_disconnected_graph() {
        let mut g = GraphStore::with_nodes(6);
        // 0-1-2 chain, 3-4 pair, 5 isolated
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(2));
        g.add_edge(NodeId(3), NodeId(4));

        let components = g.components();
        assert_eq!(components.len(), 3);

        assert_eq!(components[0].id(), ComponentId(0));
        assert_eq!(components[0].nodes(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(components[1].nodes(), &[NodeId(3), NodeId(4)]);
        assert_eq!(components[2].nodes(), &[NodeId(5)]);
    }

    #[test]
    fn component_adjacency_is_preserved() {
        let mut g = GraphStore::with_nodes(3);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(2));

        let components = g.components();
        assert_eq!(components.len(), 1);

        let view = &components[0];
        assert_eq!(view.neighbors(NodeId(1)), &[NodeId(0), NodeId(2)]);
        assert_eq!(view.neighbors(NodeId(0)), &[NodeId(1)]);
    }

    #[test]
    fn duplicate_edges_and_self_loops_ignored() {
        let mut g = GraphStore::with_nodes(2);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(0));
        g.add_edge(NodeId(0), NodeId(0));

        assert_eq!(g.neighbors(NodeId(0)), &[NodeId(1)]);
        assert_eq!(g.neighbors(NodeId(1)), &[NodeId(0)]);
    }

    #[test]
    fn parse_graph_json() {
        let g = GraphStore::from_json_str(r#"{ "nodes": 4, "edges": [[0, 1], [2, 3]] }"#)
            .expect("valid graph");
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.components().len(), 2);
    }

    #[test]
    fn parse_rejects_out_of_range_edge() {
        let err = GraphStore::from_json_str(r#"{ "nodes": 2, "edges": [[0, 5]] }"#)
            .expect_err("edge endpoint out of range");
        assert!(matches!(err, GraphError::EdgeOutOfRange(0, 5, 2)));
    }
}
