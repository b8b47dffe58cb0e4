//! Lightweight selection references that survive document changes.
//!
//! A bookmark only holds raw positions, so it can be mapped through changes
//! without access to the documents in between (undo history stores these).

use apogee_editor_model::{Mappable, Node};

use super::{Direction, GapSelection, NodeSelection, Selection, TextSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapSelectionBookmark {
    anchor: usize,
    head: usize,
}

impl GapSelectionBookmark {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn map<M: Mappable + ?Sized>(&self, mapping: &M) -> Self {
        Self::new(mapping.map(self.anchor), mapping.map(self.head))
    }

    pub fn resolve(&self, doc: &Node) -> Selection {
        let anchor = doc.resolve_clamped(self.anchor);
        let head = doc.resolve_clamped(self.head);
        if GapSelection::is_gap_location(&anchor) || GapSelection::is_gap_location(&head) {
            GapSelection::between(&anchor, &head)
        } else {
            log::debug!("gap bookmark {}..{} resolved away from any gap", self.anchor, self.head);
            Selection::near(&head, Direction::Forward)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionBookmark {
    Text { anchor: usize, head: usize },
    Node { anchor: usize },
    All,
    Gap(GapSelectionBookmark),
}

impl SelectionBookmark {
    pub fn map<M: Mappable + ?Sized>(&self, mapping: &M) -> Self {
        match *self {
            SelectionBookmark::Text { anchor, head } => SelectionBookmark::Text {
                anchor: mapping.map(anchor),
                head: mapping.map(head),
            },
            SelectionBookmark::Node { anchor } => {
                let result = mapping.map_result(anchor, 1);
                if result.deleted {
                    SelectionBookmark::Text {
                        anchor: result.pos,
                        head: result.pos,
                    }
                } else {
                    SelectionBookmark::Node { anchor: result.pos }
                }
            }
            SelectionBookmark::All => SelectionBookmark::All,
            SelectionBookmark::Gap(gap) => SelectionBookmark::Gap(gap.map(mapping)),
        }
    }

    pub fn resolve(&self, doc: &Node) -> Selection {
        match self {
            SelectionBookmark::Text { anchor, head } => TextSelection::between(
                &doc.resolve_clamped(*anchor),
                &doc.resolve_clamped(*head),
                None,
            ),
            SelectionBookmark::Node { anchor } => {
                let pos = doc.resolve_clamped(*anchor);
                match pos.node_after() {
                    Some(node) if NodeSelection::is_selectable(&node) => NodeSelection::new(pos.clone())
                        .map(Selection::Node)
                        .unwrap_or_else(|_| Selection::near(&pos, Direction::Forward)),
                    _ => Selection::near(&pos, Direction::Forward),
                }
            }
            SelectionBookmark::All => Selection::All(super::AllSelection::new(doc)),
            SelectionBookmark::Gap(gap) => gap.resolve(doc),
        }
    }
}
