//! Output types for the JavaScript host.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! renders the mind map from them.

use serde::Serialize;

use crate::editor::Editor;
use crate::error::MindMapError;
use crate::layout::Handles;
use crate::tree::{NodeStyle, Point};

/// A node ready for the frontend to draw
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub id: String,
    pub label: String,
    pub position: Point,
    pub collapsed: bool,
    /// Inside a collapsed branch: not drawn
    pub hidden: bool,
    /// Whether the node has children (drives the collapse toggle)
    pub has_children: bool,
    pub style: NodeStyle,
}

/// An edge between a parent and a child
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Hidden together with its child
    pub hidden: bool,
}

/// Error information shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Stable name, e.g. "invalid_parent"
    pub kind: &'static str,
    pub message: String,
}

impl From<&MindMapError> for ErrorInfo {
    fn from(e: &MindMapError) -> Self {
        Self { kind: e.kind(), message: e.to_string() }
    }
}

/// Everything the frontend needs to render the current state
#[derive(Debug, Clone, Serialize)]
pub struct ViewOutput {
    pub nodes: Vec<NodeOutput>,
    pub edges: Vec<EdgeOutput>,
    pub handles: Handles,
}

impl ViewOutput {
    pub fn from_editor(editor: &Editor) -> Self {
        let store = editor.store();
        let nodes = store
            .nodes()
            .iter()
            .map(|n| NodeOutput {
                id: n.id.clone(),
                label: n.label.clone(),
                position: n.position,
                collapsed: n.collapsed,
                hidden: n.hidden,
                has_children: !store.children(&n.id).is_empty(),
                style: n.style.clone(),
            })
            .collect();
        let edges = store
            .edges()
            .iter()
            .map(|e| EdgeOutput {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
                hidden: store.node(&e.target).is_some_and(|n| n.hidden),
            })
            .collect();
        Self { nodes, edges, handles: editor.handles() }
    }
}

/// The combined output of one call from the frontend
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutput {
    /// Operation result: new node id, removed ids, collapsed state...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl SessionOutput {
    pub fn ok(editor: &Editor, value: Option<serde_json::Value>) -> Self {
        Self { value, view: Some(ViewOutput::from_editor(editor)), error: None }
    }

    pub fn err(e: &MindMapError) -> Self {
        Self { value: None, view: None, error: Some(e.into()) }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("session output serialization is infallible")
    }
}
