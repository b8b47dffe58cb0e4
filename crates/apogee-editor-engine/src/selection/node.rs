use apogee_editor_model::{Mappable, Node, ResolvedPos};
use serde_json::Value;

use super::{Direction, Selection, SelectionJson, json_pos};
use crate::error::SelectionError;

/// Selection of a single node, from the position before it to the position
/// after it
#[derive(Debug, Clone)]
pub struct NodeSelection {
    anchor: ResolvedPos,
    head: ResolvedPos,
    node: Node,
}

impl NodeSelection {
    pub const JSON_ID: &'static str = "node";

    /// Select the node directly after `pos`
    pub fn new(pos: ResolvedPos) -> Result<Self, SelectionError> {
        let node = pos.node_after().ok_or(SelectionError::NoNodeAt(pos.pos()))?;
        let head = pos.doc().resolve(pos.pos() + node.node_size())?;
        Ok(Self {
            anchor: pos,
            head,
            node,
        })
    }

    pub fn create(doc: &Node, from: usize) -> Result<Self, SelectionError> {
        Self::new(doc.resolve(from)?)
    }

    pub fn anchor(&self) -> &ResolvedPos {
        &self.anchor
    }

    pub fn head(&self) -> &ResolvedPos {
        &self.head
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn is_selectable(node: &Node) -> bool {
        !node.is_text() && node.node_type().selectable()
    }

    pub fn map<M: Mappable + ?Sized>(&self, doc: &Node, mapping: &M) -> Selection {
        let result = mapping.map_result(self.anchor.pos(), 1);
        let pos = doc.resolve_clamped(result.pos);
        if result.deleted {
            return Selection::near(&pos, Direction::Forward);
        }
        match Self::new(pos.clone()) {
            Ok(sel) => Selection::Node(sel),
            Err(_) => Selection::near(&pos, Direction::Forward),
        }
    }

    pub fn to_json(&self) -> SelectionJson {
        SelectionJson::Node {
            anchor: self.anchor.pos(),
        }
    }

    pub fn from_json(doc: &Node, json: &Value) -> Result<Selection, SelectionError> {
        let anchor = json_pos(json, "anchor").ok_or(SelectionError::InvalidInput("NodeSelection"))?;
        Ok(Selection::Node(Self::create(doc, anchor)?))
    }
}
