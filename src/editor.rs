//! Edit controller.
//!
//! Every structural operation runs as one transaction: mutate the store, lay
//! the whole tree out again from the anchor the root had before the mutation,
//! commit the positions, then leave a refocus request for the host. A failed
//! mutation returns before layout, so the mind map is untouched.

use serde::Serialize;
use tracing::{info, warn};

use crate::document::{self, Document};
use crate::error::Result;
use crate::layout::{Direction, Handles, LayoutConfig, layout_tree};
use crate::tree::{NodeStyle, Point, TreeStore};

/// Delay the host should wait before refocusing, so a pending paint settles.
pub const REFOCUS_DELAY_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum Focus {
    Node(String),
    All,
}

/// A fire-and-forget request for the viewport. A newer request replaces an
/// older one that has not been picked up yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusRequest {
    pub target: Focus,
    pub delay_ms: u32,
}

impl FocusRequest {
    pub fn dispatch(&self, viewport: &mut dyn Viewport) {
        match &self.target {
            Focus::Node(id) => viewport.focus_on(id),
            Focus::All => viewport.fit_all(),
        }
    }
}

/// The host's viewport. Both calls are best-effort and return nothing.
pub trait Viewport {
    fn focus_on(&mut self, node_id: &str);
    fn fit_all(&mut self);
}

#[derive(Debug, Clone)]
pub struct Editor {
    store: TreeStore,
    config: LayoutConfig,
    direction: Direction,
    focus: Option<FocusRequest>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), Direction::default())
    }
}

impl Editor {
    /// A fresh mind map with the root at the configured default anchor.
    pub fn new(config: LayoutConfig, direction: Direction) -> Self {
        let mut store = TreeStore::new();
        store.set_root_position(config.default_anchor);
        Self { store, config, direction, focus: None }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn handles(&self) -> Handles {
        self.direction.handles()
    }

    /// Take the pending refocus request, if any.
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.focus.take()
    }

    fn request_focus(&mut self, target: Focus) {
        self.focus = Some(FocusRequest { target, delay_ms: REFOCUS_DELAY_MS });
    }

    fn relayout(&mut self, anchor: Point) {
        let result = layout_tree(
            self.store.nodes(),
            self.store.edges(),
            anchor,
            self.direction,
            &self.config,
        );
        self.store.apply_positions(&result.positions);
    }

    pub fn add_child(&mut self, parent_id: &str, label: &str) -> Result<String> {
        let anchor = self.store.root_position();
        let id = self.store.add_child(parent_id, label).inspect_err(|e| {
            warn!(parent = parent_id, error = %e, "add child rejected");
        })?;
        self.relayout(anchor);
        self.request_focus(Focus::Node(id.clone()));
        info!(parent = parent_id, node = %id, "child added");
        Ok(id)
    }

    pub fn delete_subtree(&mut self, node_id: &str) -> Result<Vec<String>> {
        let anchor = self.store.root_position();
        let removed = self.store.delete_subtree(node_id).inspect_err(|e| {
            warn!(node = node_id, error = %e, "delete rejected");
        })?;
        self.relayout(anchor);
        self.request_focus(Focus::All);
        info!(node = node_id, removed = removed.len(), "subtree deleted");
        Ok(removed)
    }

    pub fn toggle_collapse(&mut self, node_id: &str) -> Result<bool> {
        let anchor = self.store.root_position();
        let collapsed = self.store.toggle_collapse(node_id).inspect_err(|e| {
            warn!(node = node_id, error = %e, "collapse rejected");
        })?;
        self.relayout(anchor);
        info!(node = node_id, collapsed, "collapse toggled");
        Ok(collapsed)
    }

    /// Relabel a node. Layout does not depend on labels.
    pub fn set_label(&mut self, node_id: &str, label: &str) -> Result<()> {
        self.store.set_label(node_id, label)
    }

    /// Restyle a node. Layout does not depend on styles.
    pub fn set_style(&mut self, node_id: &str, style: NodeStyle) -> Result<()> {
        self.store.set_style(node_id, style)
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction {
            return;
        }
        self.direction = direction;
        self.relayout(self.store.root_position());
        self.request_focus(Focus::All);
        info!(?direction, "direction changed");
    }

    /// Replace the whole mind map with a document. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let store = document::import_json(json, self.direction, &self.config).inspect_err(|e| {
            warn!(error = %e, "import rejected");
        })?;
        self.store = store;
        self.request_focus(Focus::All);
        info!(nodes = self.store.len(), "document imported");
        Ok(())
    }

    pub fn export_json(&self) -> String {
        document::export_json(&self.store)
    }

    pub fn document(&self) -> Document {
        Document::from_store(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MindMapError;
    use crate::tree::ROOT_ID;

    #[derive(Default)]
    struct RecordingViewport {
        calls: Vec<String>,
    }

    impl Viewport for RecordingViewport {
        fn focus_on(&mut self, node_id: &str) {
            self.calls.push(format!("focus:{node_id}"));
        }

        fn fit_all(&mut self) {
            self.calls.push("fit".to_string());
        }
    }

    #[test]
    fn test_add_child_lays_out_and_focuses_new_node() {
        let mut editor = Editor::default();
        let a = editor.add_child(ROOT_ID, "A").unwrap();
        let b = editor.add_child(ROOT_ID, "B").unwrap();

        let store = editor.store();
        assert_eq!(store.node(&a).unwrap().position, Point::new(650.0, 125.0));
        assert_eq!(store.node(&b).unwrap().position, Point::new(650.0, 275.0));
        assert_eq!(
            editor.take_focus_request(),
            Some(FocusRequest { target: Focus::Node(b), delay_ms: REFOCUS_DELAY_MS })
        );
        assert_eq!(editor.take_focus_request(), None);
    }

    #[test]
    fn test_delete_recenters_remaining_child() {
        let mut editor = Editor::default();
        let a = editor.add_child(ROOT_ID, "A").unwrap();
        let b = editor.add_child(ROOT_ID, "B").unwrap();

        editor.delete_subtree(&a).unwrap();
        assert_eq!(editor.store().node(&b).unwrap().position, Point::new(650.0, 200.0));
        assert_eq!(editor.take_focus_request().unwrap().target, Focus::All);
    }

    #[test]
    fn test_failed_operation_leaves_state_untouched() {
        let mut editor = Editor::default();
        let a = editor.add_child(ROOT_ID, "A").unwrap();
        editor.toggle_collapse(&a).unwrap();
        let before = editor.export_json();
        editor.take_focus_request();

        assert!(matches!(editor.add_child(&a, "x"), Err(MindMapError::InvalidParent(_))));
        assert_eq!(editor.delete_subtree(ROOT_ID), Err(MindMapError::RootDeletionForbidden));
        assert!(editor.import_json("{ broken").is_err());

        assert_eq!(editor.export_json(), before);
        assert_eq!(editor.take_focus_request(), None);
    }

    #[test]
    fn test_root_never_moves() {
        let mut editor = Editor::default();
        let a = editor.add_child(ROOT_ID, "A").unwrap();
        editor.add_child(&a, "A1").unwrap();
        editor.add_child(ROOT_ID, "B").unwrap();
        editor.delete_subtree(&a).unwrap();
        assert_eq!(editor.store().root_position(), Point::new(250.0, 200.0));
    }

    #[test]
    fn test_direction_change_relayouts() {
        let mut editor = Editor::default();
        let a = editor.add_child(ROOT_ID, "A").unwrap();
        editor.take_focus_request();

        editor.set_direction(Direction::TopToBottom);
        assert_eq!(editor.store().node(&a).unwrap().position, Point::new(250.0, 600.0));
        assert_eq!(editor.handles(), Direction::TopToBottom.handles());
        assert_eq!(editor.take_focus_request().unwrap().target, Focus::All);
    }

    #[test]
    fn test_latest_focus_request_wins() {
        let mut editor = Editor::default();
        let a = editor.add_child(ROOT_ID, "A").unwrap();
        editor.delete_subtree(&a).unwrap();
        let b = editor.add_child(ROOT_ID, "B").unwrap();

        let mut viewport = RecordingViewport::default();
        editor.take_focus_request().unwrap().dispatch(&mut viewport);
        assert_eq!(viewport.calls, vec![format!("focus:{b}")]);
    }

    #[test]
    fn test_import_replaces_store() {
        let mut source = Editor::default();
        let a = source.add_child(ROOT_ID, "A").unwrap();
        source.set_label(&a, "Renamed").unwrap();

        let mut editor = Editor::default();
        editor.import_json(&source.export_json()).unwrap();
        assert_eq!(editor.store().node(&a).unwrap().label, "Renamed");
        assert_eq!(editor.document(), source.document());
    }
}
