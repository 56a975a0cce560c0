use serde::{Deserialize, Serialize};

/// Id of the distinguished root node. Created once, never deleted.
pub const ROOT_ID: &str = "root";

/// Where the root sits in a fresh mind map.
pub const DEFAULT_ANCHOR: Point = Point { x: 250.0, y: 200.0 };

pub const DEFAULT_ROOT_LABEL: &str = "Main Topic";

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visual style of a node. Layout never reads it.
///
/// Every field has a default so a partially specified style in an imported
/// document is filled in field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
    pub background_color: String,
    pub text_color: String,
    pub font_size: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            font_size: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// Written by layout only; the root's position is the layout anchor.
    pub position: Point,
    pub collapsed: bool,
    pub style: NodeStyle,
    /// Derived: true iff some ancestor is collapsed.
    pub hidden: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position,
            collapsed: false,
            style: NodeStyle::default(),
            hidden: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }
}

/// A parent -> child link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("e{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}
