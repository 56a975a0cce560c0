//! Persisted JSON shape of a mind map.
//!
//! Export writes exactly what is in the store. Import trusts nothing: the
//! document is validated as a tree and laid out again from the root's
//! position, so stale node positions in the file never reach the screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MindMapError, Result};
use crate::layout::{Direction, LayoutConfig, layout_tree};
use crate::tree::{Edge, Node, NodeStyle, Point, ROOT_ID, TreeStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<DocumentNode>,
    pub edges: Vec<Edge>,
}

/// Node type tag written on export. Whatever tag an imported file carries,
/// the node is read as this one.
pub const NODE_TYPE: &str = "mindmap";

fn default_node_type() -> String {
    NODE_TYPE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub kind: String,
    pub data: NodeData,
    /// Advisory on import; only the root's is used, as the layout anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub style: NodeStyle,
}

impl Document {
    pub fn from_store(store: &TreeStore) -> Self {
        let nodes = store
            .nodes()
            .iter()
            .map(|n| DocumentNode {
                id: n.id.clone(),
                kind: default_node_type(),
                data: NodeData {
                    label: n.label.clone(),
                    is_collapsed: n.collapsed,
                    style: n.style.clone(),
                },
                position: Some(n.position),
            })
            .collect();
        Self { nodes, edges: store.edges().to_vec() }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("document serialization is infallible")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MindMapError::MalformedDocument(e.to_string()))
    }

    /// Validate the document and build a laid-out store from it.
    ///
    /// The root's position in the document becomes the anchor; without one
    /// the configured default anchor is used.
    pub fn into_store(self, direction: Direction, cfg: &LayoutConfig) -> Result<TreeStore> {
        let anchor = self
            .nodes
            .iter()
            .find(|n| n.id == ROOT_ID)
            .and_then(|n| n.position)
            .unwrap_or(cfg.default_anchor);

        let nodes = self
            .nodes
            .into_iter()
            .map(|n| Node {
                position: if n.id == ROOT_ID { anchor } else { Point::default() },
                id: n.id,
                label: n.data.label,
                collapsed: n.data.is_collapsed,
                style: n.data.style,
                hidden: false,
            })
            .collect();

        let mut store = TreeStore::from_parts(nodes, self.edges)?;
        let result = layout_tree(store.nodes(), store.edges(), anchor, direction, cfg);
        store.apply_positions(&result.positions);

        debug!(nodes = store.len(), "imported document");
        Ok(store)
    }
}

/// Serialize the store as a JSON document.
pub fn export_json(store: &TreeStore) -> String {
    Document::from_store(store).to_json()
}

/// Parse, validate and lay out a JSON document.
pub fn import_json(json: &str, direction: Direction, cfg: &LayoutConfig) -> Result<TreeStore> {
    Document::from_json(json)?.into_store(direction, cfg)
}
