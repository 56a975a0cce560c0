//! Mind map data model and the store that owns it.

mod model;
mod store;

pub use model::{DEFAULT_ANCHOR, DEFAULT_ROOT_LABEL, Edge, Node, NodeStyle, Point, ROOT_ID};
pub use store::TreeStore;
