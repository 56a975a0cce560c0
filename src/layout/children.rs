// Parent -> children index for one layout pass.
//
// Built from the edge list so the layouter never depends on the store's own
// indexes. Child order is edge order, which is what keeps sibling stacking
// deterministic.

use std::collections::{HashMap, HashSet};

use crate::tree::{Edge, Node};

#[derive(Debug, Clone)]
pub struct ChildIndex<'a> {
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> ChildIndex<'a> {
    /// # Panics
    ///
    /// If an edge names a node that is not in `nodes`.
    pub fn from_edges(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut children: HashMap<&'a str, Vec<&'a str>> = HashMap::new();

        for edge in edges {
            assert!(
                known.contains(edge.source.as_str()) && known.contains(edge.target.as_str()),
                "edge '{}' references a node outside the layout input",
                edge.id
            );
            children.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
        }

        Self { children }
    }

    /// Children of a node, or an empty slice for leaves.
    pub fn of(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
