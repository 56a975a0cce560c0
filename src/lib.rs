//! mindmap-core: an editable mind map with automatic tree layout.
//!
//! - [`tree`]: node/edge store and its mutation primitives
//! - [`layout`]: the layouter that positions every node from the root's anchor
//! - [`editor`]: runs user operations as mutate -> layout -> commit transactions
//! - [`document`]: JSON import/export
//! - [`wasm`]: bindings for the JavaScript frontend

pub mod document;
pub mod editor;
pub mod error;
pub mod layout;
pub mod output;
pub mod tree;
pub mod wasm;

pub use document::{Document, export_json, import_json};
pub use editor::{Editor, Focus, FocusRequest, Viewport};
pub use error::MindMapError;
pub use layout::{Direction, Handles, LayoutConfig, LayoutResult, Side, layout_tree};
pub use tree::{Edge, Node, NodeStyle, Point, ROOT_ID, TreeStore};
pub use wasm::MindMapSession;
