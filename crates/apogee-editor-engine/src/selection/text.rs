use apogee_editor_model::{Mappable, Node, ResolvedPos};
use serde_json::Value;

use super::{Direction, Selection, SelectionJson, json_pos};
use crate::error::SelectionError;

/// A text cursor or a range of inline content
#[derive(Debug, Clone)]
pub struct TextSelection {
    anchor: ResolvedPos,
    head: ResolvedPos,
}

impl TextSelection {
    pub const JSON_ID: &'static str = "text";

    /// Both positions are expected to point into inline content
    pub fn new(anchor: ResolvedPos, head: ResolvedPos) -> Self {
        Self { anchor, head }
    }

    pub fn collapsed(pos: ResolvedPos) -> Self {
        Self::new(pos.clone(), pos)
    }

    pub fn create(doc: &Node, anchor: usize, head: usize) -> Result<Self, SelectionError> {
        Ok(Self::new(doc.resolve(anchor)?, doc.resolve(head)?))
    }

    pub fn anchor(&self) -> &ResolvedPos {
        &self.anchor
    }

    pub fn head(&self) -> &ResolvedPos {
        &self.head
    }

    pub fn cursor(&self) -> Option<&ResolvedPos> {
        (self.anchor.pos() == self.head.pos()).then_some(&self.head)
    }

    pub fn map<M: Mappable + ?Sized>(&self, doc: &Node, mapping: &M) -> Selection {
        let head = doc.resolve_clamped(mapping.map(self.head.pos()));
        if !head.parent().inline_content() {
            return Selection::near(&head, Direction::Forward);
        }
        let anchor = doc.resolve_clamped(mapping.map(self.anchor.pos()));
        let anchor = if anchor.parent().inline_content() { anchor } else { head.clone() };
        Selection::Text(Self::new(anchor, head))
    }

    /// A text selection between two positions, moving endpoints that are not
    /// inside inline content to the nearest position that is
    pub fn between(anchor: &ResolvedPos, head: &ResolvedPos, bias: Option<Direction>) -> Selection {
        let d_pos = anchor.pos() as isize - head.pos() as isize;
        let bias = match bias {
            Some(bias) if d_pos == 0 => bias,
            _ if d_pos >= 0 => Direction::Forward,
            _ => Direction::Backward,
        };

        let mut head = head.clone();
        if !head.parent().inline_content() {
            let found = Selection::find_from(&head, bias, true)
                .or_else(|| Selection::find_from(&head, bias.reverse(), true));
            match found {
                Some(found) => head = found.resolved_head().clone(),
                None => return Selection::near(&head, bias),
            }
        }

        let mut anchor = anchor.clone();
        if !anchor.parent().inline_content() {
            if d_pos == 0 {
                anchor = head.clone();
            } else {
                anchor = Selection::find_from(&anchor, bias.reverse(), true)
                    .or_else(|| Selection::find_from(&anchor, bias, true))
                    .map_or_else(|| head.clone(), |found| found.resolved_anchor().clone());
                if (anchor.pos() < head.pos()) != (d_pos < 0) {
                    anchor = head.clone();
                }
            }
        }
        Selection::Text(Self::new(anchor, head))
    }

    pub fn to_json(&self) -> SelectionJson {
        SelectionJson::Text {
            anchor: self.anchor.pos(),
            head: self.head.pos(),
        }
    }

    pub fn from_json(doc: &Node, json: &Value) -> Result<Selection, SelectionError> {
        let (Some(anchor), Some(head)) = (json_pos(json, "anchor"), json_pos(json, "head")) else {
            return Err(SelectionError::InvalidInput("TextSelection"));
        };
        Ok(Selection::Text(Self::create(doc, anchor, head)?))
    }
}
