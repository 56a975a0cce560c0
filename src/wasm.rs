//! WASM bindings for the mindmap-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Every call returns a JSON string; failures come back as an `error` object
//! instead of an exception.

use wasm_bindgen::prelude::*;

use crate::editor::Editor;
use crate::error::MindMapError;
use crate::layout::Direction;
use crate::output::SessionOutput;
use crate::tree::NodeStyle;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(s: &str);
}

fn report_error(context: &str, e: &MindMapError) -> String {
    tracing::warn!(context, error = %e, "operation failed");
    #[cfg(target_arch = "wasm32")]
    console_error(&format!("{context}: {e}"));
    SessionOutput::err(e).to_json()
}

/// One editing session: the mind map plus its pending viewport request.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct MindMapSession {
    editor: Editor,
}

#[wasm_bindgen]
impl MindMapSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nodes, edges and handle sides.
    pub fn view(&self) -> String {
        SessionOutput::ok(&self.editor, None).to_json()
    }

    /// Add a child and return its id in `value`.
    pub fn add_child(&mut self, parent_id: &str, label: &str) -> String {
        match self.editor.add_child(parent_id, label) {
            Ok(id) => SessionOutput::ok(&self.editor, Some(id.into())).to_json(),
            Err(e) => report_error("add_child", &e),
        }
    }

    /// Delete a subtree and return the removed ids in `value`.
    pub fn delete_subtree(&mut self, node_id: &str) -> String {
        match self.editor.delete_subtree(node_id) {
            Ok(removed) => SessionOutput::ok(&self.editor, Some(removed.into())).to_json(),
            Err(e) => report_error("delete_subtree", &e),
        }
    }

    /// Toggle collapse and return the new state in `value`.
    pub fn toggle_collapse(&mut self, node_id: &str) -> String {
        match self.editor.toggle_collapse(node_id) {
            Ok(collapsed) => SessionOutput::ok(&self.editor, Some(collapsed.into())).to_json(),
            Err(e) => report_error("toggle_collapse", &e),
        }
    }

    pub fn set_label(&mut self, node_id: &str, label: &str) -> String {
        match self.editor.set_label(node_id, label) {
            Ok(()) => SessionOutput::ok(&self.editor, None).to_json(),
            Err(e) => report_error("set_label", &e),
        }
    }

    /// `style_json` is a partial style object; missing fields get defaults.
    pub fn set_style(&mut self, node_id: &str, style_json: &str) -> String {
        let result = serde_json::from_str::<NodeStyle>(style_json)
            .map_err(|e| MindMapError::MalformedDocument(format!("style: {e}")))
            .and_then(|style| self.editor.set_style(node_id, style));
        match result {
            Ok(()) => SessionOutput::ok(&self.editor, None).to_json(),
            Err(e) => report_error("set_style", &e),
        }
    }

    /// "LR" or "TB".
    pub fn set_direction(&mut self, direction: &str) -> String {
        match Direction::from_name(direction) {
            Some(d) => {
                self.editor.set_direction(d);
                SessionOutput::ok(&self.editor, None).to_json()
            }
            None => report_error(
                "set_direction",
                &MindMapError::MalformedDocument(format!("unknown direction '{direction}'")),
            ),
        }
    }

    pub fn import_document(&mut self, json: &str) -> String {
        match self.editor.import_json(json) {
            Ok(()) => SessionOutput::ok(&self.editor, None).to_json(),
            Err(e) => report_error("import_document", &e),
        }
    }

    pub fn export_document(&self) -> String {
        self.editor.export_json()
    }

    /// The pending refocus request as JSON, or `null`.
    pub fn take_focus_request(&mut self) -> String {
        serde_json::to_string(&self.editor.take_focus_request()).unwrap_or_else(|_| "null".to_string())
    }
}
