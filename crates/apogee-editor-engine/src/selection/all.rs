use apogee_editor_model::{Node, ResolvedPos};
use serde_json::Value;

use super::Selection;
use crate::error::SelectionError;

/// Selection spanning the whole document
#[derive(Debug, Clone)]
pub struct AllSelection {
    anchor: ResolvedPos,
    head: ResolvedPos,
}

impl AllSelection {
    pub const JSON_ID: &'static str = "all";

    pub fn new(doc: &Node) -> Self {
        Self {
            anchor: doc.resolve_clamped(0),
            head: doc.resolve_clamped(doc.content_size()),
        }
    }

    pub fn anchor(&self) -> &ResolvedPos {
        &self.anchor
    }

    pub fn head(&self) -> &ResolvedPos {
        &self.head
    }

    pub fn from_json(doc: &Node, _json: &Value) -> Result<Selection, SelectionError> {
        Ok(Selection::All(Self::new(doc)))
    }
}
