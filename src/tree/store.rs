// Tree store: the authoritative node/edge set of a mind map.
//
// - Nodes and edges keep insertion order (child order = edge insertion order)
// - A children index and a parent index replace repeated edge scans
// - Every mutation is all-or-nothing: errors are detected before touching state
// - The rooted-tree invariant holds after every successful call

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::model::{DEFAULT_ANCHOR, DEFAULT_ROOT_LABEL, Edge, Node, NodeStyle, Point, ROOT_ID};
use crate::error::{MindMapError, Result};

#[derive(Debug, Clone)]
pub struct TreeStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Node id -> index into `nodes`.
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<String>>,
    parent: HashMap<String, String>,
    next_id: usize,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    /// A mind map holding only the root, at the default anchor.
    pub fn new() -> Self {
        Self::with_root(Node::new(ROOT_ID, DEFAULT_ROOT_LABEL, DEFAULT_ANCHOR))
    }

    pub fn with_root(root: Node) -> Self {
        let mut index = HashMap::new();
        index.insert(root.id.clone(), 0);
        Self {
            nodes: vec![root],
            edges: Vec::new(),
            index,
            children: HashMap::new(),
            parent: HashMap::new(),
            next_id: 1,
        }
    }

    /// Build a store from untrusted parts, checking the rooted-tree invariant.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let malformed = |msg: String| MindMapError::MalformedDocument(msg);

        let mut index = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(malformed(format!("duplicate node id '{}'", node.id)));
            }
        }
        if !index.contains_key(ROOT_ID) {
            return Err(malformed(format!("missing root node '{ROOT_ID}'")));
        }

        let mut edge_ids: HashSet<String> = HashSet::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut parent: HashMap<String, String> = HashMap::new();
        for edge in &edges {
            if !edge_ids.insert(edge.id.clone()) {
                return Err(malformed(format!("duplicate edge id '{}'", edge.id)));
            }
            if !index.contains_key(&edge.source) {
                return Err(malformed(format!(
                    "edge '{}' references unknown parent '{}'",
                    edge.id, edge.source
                )));
            }
            if !index.contains_key(&edge.target) {
                return Err(malformed(format!(
                    "edge '{}' references unknown child '{}'",
                    edge.id, edge.target
                )));
            }
            if edge.target == ROOT_ID {
                return Err(malformed(format!("edge '{}' points into the root", edge.id)));
            }
            if parent.insert(edge.target.clone(), edge.source.clone()).is_some() {
                return Err(malformed(format!("node '{}' has more than one parent", edge.target)));
            }
            children.entry(edge.source.clone()).or_default().push(edge.target.clone());
        }

        let next_id = nodes
            .iter()
            .filter_map(|n| n.id.strip_prefix("node-")?.parse::<usize>().ok())
            .max()
            .map_or(1, |n| n.saturating_add(1));

        let mut store = Self { nodes, edges, index, children, parent, next_id };

        // With one parent per node, anything not reachable from root sits on a cycle
        // or in a detached component.
        let reachable = store.subtree_preorder(ROOT_ID);
        if reachable.len() != store.nodes.len() {
            let seen: HashSet<&str> = reachable.iter().map(String::as_str).collect();
            let stray = store
                .nodes
                .iter()
                .find(|n| !seen.contains(n.id.as_str()))
                .map(|n| n.id.clone())
                .unwrap_or_default();
            return Err(malformed(format!("node '{stray}' is not reachable from root")));
        }

        store.refresh_hidden(ROOT_ID);
        Ok(store)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.index.get(id).map(|&i| &mut self.nodes[i])
    }

    pub fn root(&self) -> &Node {
        self.node(ROOT_ID).expect("root node always exists")
    }

    pub fn root_position(&self) -> Point {
        self.root().position
    }

    /// Move the root. The root's position is the anchor of every layout pass.
    pub fn set_root_position(&mut self, position: Point) {
        if let Some(root) = self.node_mut(ROOT_ID) {
            root.position = position;
        }
    }

    /// Children of `id` in edge insertion order.
    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parent.get(id).map(String::as_str)
    }

    /// Transitive children of `id`, excluding `id` itself.
    pub fn descendants(&self, id: &str) -> HashSet<String> {
        let mut out: HashSet<String> = self.subtree_preorder(id).into_iter().collect();
        out.remove(id);
        out
    }

    /// `id` followed by all its descendants, depth-first in child order.
    /// Empty if `id` is unknown.
    fn subtree_preorder(&self, id: &str) -> Vec<String> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current.to_string());
            stack.extend(self.children(current).iter().rev().map(String::as_str));
        }
        out
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = format!("node-{}", self.next_id);
            // Wraps only past usize::MAX, where low ids are free again.
            self.next_id = self.next_id.wrapping_add(1);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Attach a new child under `parent_id` and return its id.
    ///
    /// The parent must exist and be editable: not collapsed and not inside a
    /// collapsed branch. The child starts at its parent's position until the
    /// next layout pass.
    pub fn add_child(&mut self, parent_id: &str, label: impl Into<String>) -> Result<String> {
        let placeholder = match self.node(parent_id) {
            Some(p) if !p.collapsed && !p.hidden => p.position,
            _ => return Err(MindMapError::InvalidParent(parent_id.to_string())),
        };

        let id = self.fresh_id();
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node::new(id.clone(), label, placeholder));
        self.edges.push(Edge::between(parent_id, &id));
        self.children.entry(parent_id.to_string()).or_default().push(id.clone());
        self.parent.insert(id.clone(), parent_id.to_string());

        debug!(parent = parent_id, child = %id, "added child");
        Ok(id)
    }

    /// Remove `id`, every descendant, and every edge touching them.
    /// Returns the removed ids, depth-first.
    ///
    /// Nodes inside a collapsed branch are frozen and cannot be addressed;
    /// they report `NodeNotFound`. A collapsed node itself can be deleted.
    pub fn delete_subtree(&mut self, id: &str) -> Result<Vec<String>> {
        if id == ROOT_ID {
            return Err(MindMapError::RootDeletionForbidden);
        }
        if self.node(id).is_none_or(|n| n.hidden) {
            return Err(MindMapError::NodeNotFound(id.to_string()));
        }

        let removed = self.subtree_preorder(id);
        let doomed: HashSet<&str> = removed.iter().map(String::as_str).collect();

        self.nodes.retain(|n| !doomed.contains(n.id.as_str()));
        self.edges
            .retain(|e| !doomed.contains(e.source.as_str()) && !doomed.contains(e.target.as_str()));
        if let Some(parent) = self.parent.get(id).cloned() {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|c| c != id);
            }
        }
        for gone in &removed {
            self.children.remove(gone);
            self.parent.remove(gone);
        }
        self.index = self.nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();

        debug!(node = id, count = removed.len(), "deleted subtree");
        Ok(removed)
    }

    /// Flip the collapsed flag of `id` and refresh visibility below it.
    pub fn toggle_collapse(&mut self, id: &str) -> Result<bool> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| MindMapError::NodeNotFound(id.to_string()))?;
        node.collapsed = !node.collapsed;
        let collapsed = node.collapsed;

        self.refresh_hidden(id);
        debug!(node = id, collapsed, "toggled collapse");
        Ok(collapsed)
    }

    /// Recompute `hidden` for every descendant of `id` from the collapsed
    /// flags on the way down. `id`'s own flag is taken as given.
    fn refresh_hidden(&mut self, id: &str) {
        let mut stack: Vec<(String, bool)> = Vec::new();
        if let Some(node) = self.node(id) {
            let below = node.collapsed || node.hidden;
            stack.extend(self.children(id).iter().map(|c| (c.clone(), below)));
        }
        while let Some((current, hidden)) = stack.pop() {
            let Some(node) = self.node_mut(&current) else {
                continue;
            };
            node.hidden = hidden;
            let below = hidden || node.collapsed;
            stack.extend(self.children(&current).iter().map(|c| (c.clone(), below)));
        }
    }

    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| MindMapError::NodeNotFound(id.to_string()))?;
        node.label = label.into();
        Ok(())
    }

    pub fn set_style(&mut self, id: &str, style: NodeStyle) -> Result<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| MindMapError::NodeNotFound(id.to_string()))?;
        node.style = style;
        Ok(())
    }

    /// Commit positions computed by layout. Ids not in the store are ignored.
    pub fn apply_positions(&mut self, positions: &HashMap<String, Point>) {
        for node in &mut self.nodes {
            if let Some(&p) = positions.get(&node.id) {
                node.position = p;
            }
        }
    }
}
