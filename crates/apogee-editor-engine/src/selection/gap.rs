//! The gap cursor: a selection for positions where no text cursor can live.
//!
//! A *gap location* is a position at the document root that touches a leaf
//! block, i.e. a block node without editable interior such as a component
//! cell or a horizontal rule. Gap selections only ever sit on such positions
//! (at least one of their endpoints does), and they fall back to a regular
//! selection as soon as an edit removes the geometry that made the gap.

use apogee_editor_model::{Mappable, Node, ResolvedPos, Slice};
use serde_json::Value;

use super::{Direction, GapSelectionBookmark, NodeSelection, Selection, SelectionJson, json_pos, replace_range};
use crate::error::{SelectionError, TransformError};
use crate::state::Transaction;

/// A block node with no editable interior
pub fn is_leaf_block(node: Option<&Node>) -> bool {
    node.is_some_and(|node| node.is_block() && node.is_atom())
}

/// Selection anchored on (or stretching from) a gap location.
///
/// The gap flags of both endpoints are computed once at construction; a
/// selection is never updated in place.
#[derive(Debug, Clone)]
pub struct GapSelection {
    anchor: ResolvedPos,
    head: ResolvedPos,
    anchor_is_gap: bool,
    head_is_gap: bool,
}

impl GapSelection {
    pub const JSON_ID: &'static str = "gapselection";

    pub fn new(anchor: ResolvedPos, head: ResolvedPos) -> Self {
        let anchor_is_gap = Self::is_gap_location(&anchor);
        let head_is_gap = anchor.pos() != head.pos() && Self::is_gap_location(&head);
        Self {
            anchor,
            head,
            anchor_is_gap,
            head_is_gap,
        }
    }

    /// A collapsed gap cursor at `pos`
    pub fn collapsed(pos: ResolvedPos) -> Self {
        Self::new(pos.clone(), pos)
    }

    pub fn anchor(&self) -> &ResolvedPos {
        &self.anchor
    }

    pub fn head(&self) -> &ResolvedPos {
        &self.head
    }

    pub fn anchor_is_gap(&self) -> bool {
        self.anchor_is_gap
    }

    /// Always false for a collapsed selection
    pub fn head_is_gap(&self) -> bool {
        self.head_is_gap
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor.pos() == self.head.pos()
    }

    /// The cursor position when the selection is collapsed
    pub fn cursor(&self) -> Option<&ResolvedPos> {
        self.is_collapsed().then_some(&self.head)
    }

    /// A collapsed gap cursor is drawn by the gap cursor decoration rather
    /// than as a regular selection
    pub fn visible(&self) -> bool {
        !self.is_collapsed()
    }

    pub fn from(&self) -> &ResolvedPos {
        if self.anchor.pos() <= self.head.pos() { &self.anchor } else { &self.head }
    }

    pub fn to(&self) -> &ResolvedPos {
        if self.anchor.pos() <= self.head.pos() { &self.head } else { &self.anchor }
    }

    pub fn map<M: Mappable + ?Sized>(&self, doc: &Node, mapping: &M) -> Selection {
        let head = doc.resolve_clamped(mapping.map(self.head.pos()));
        let anchor = doc.resolve_clamped(mapping.map(self.anchor.pos()));
        if Self::is_gap_location(&anchor) || Self::is_gap_location(&head) {
            return Selection::Gap(Self::new(anchor, head));
        }
        log::debug!(
            "gap selection {}..{} no longer touches a gap, falling back near {}",
            self.anchor.pos(),
            self.head.pos(),
            head.pos()
        );
        Selection::near(&head, Direction::Forward)
    }

    /// Replace the selected range. Deleting content keeps the marks that
    /// spanned the range so that the next typed text picks them up.
    pub fn replace(&self, tr: &mut Transaction, content: Slice) -> Result<(), TransformError> {
        let deleting = content.is_empty();
        replace_range(self.from(), self.to(), tr, content)?;
        if deleting && let Some(marks) = self.from().marks_across(self.to()) {
            tr.ensure_marks(marks);
        }
        Ok(())
    }

    pub fn to_json(&self) -> SelectionJson {
        SelectionJson::Gap {
            anchor: self.anchor.pos(),
            head: self.head.pos(),
        }
    }

    pub fn from_json(doc: &Node, json: &Value) -> Result<Selection, SelectionError> {
        let (Some(anchor), Some(head)) = (json_pos(json, "anchor"), json_pos(json, "head")) else {
            return Err(SelectionError::InvalidInput("GapSelection"));
        };
        Ok(Selection::Gap(Self::new(doc.resolve(anchor)?, doc.resolve(head)?)))
    }

    pub fn get_bookmark(&self) -> GapSelectionBookmark {
        GapSelectionBookmark::new(self.anchor.pos(), self.head.pos())
    }

    /// Build a selection between two positions. A gap selection is produced
    /// when either end is a gap location; an end that is neither a gap nor
    /// inside inline content is pulled onto the other end.
    pub fn between(anchor: &ResolvedPos, head: &ResolvedPos) -> Selection {
        let (anchor_gap, head_gap) = (Self::is_gap_location(anchor), Self::is_gap_location(head));
        match (anchor_gap, head_gap) {
            (false, false) => Selection::near(head, Direction::Forward),
            (true, false) if !head.parent().inline_content() => Selection::Gap(Self::collapsed(anchor.clone())),
            (false, true) if !anchor.parent().inline_content() => Selection::Gap(Self::collapsed(head.clone())),
            _ => Selection::Gap(Self::new(anchor.clone(), head.clone())),
        }
    }

    /// Whether a gap cursor may sit at `pos`
    pub fn is_gap_location(pos: &ResolvedPos) -> bool {
        pos.depth() == 0
            && (is_leaf_block(pos.node_before().as_ref()) || is_leaf_block(pos.node_after().as_ref()))
    }

    /// Search from `start` in `dir` for the next gap location.
    ///
    /// With `must_move` unset, `start` itself is returned when it already is a
    /// gap location. The search climbs out of the enclosing nodes until it
    /// finds a sibling in the search direction, then descends into that
    /// sibling along its near edge, checking each boundary it crosses. An
    /// unselectable atom is stepped over and the search restarts behind it.
    pub fn find_from(start: &ResolvedPos, dir: Direction, must_move: bool) -> Option<ResolvedPos> {
        let doc = start.doc().clone();
        let mut current = start.clone();
        let mut must_move = must_move;

        loop {
            if !must_move && Self::is_gap_location(&current) {
                return Some(current);
            }

            let mut pos = current.pos();
            let mut next: Option<Node> = None;
            for depth in (0..=current.depth()).rev() {
                let parent = current.node(depth);
                let sibling = match dir {
                    Direction::Forward => parent.maybe_child(current.index_after(depth)),
                    Direction::Backward => current
                        .index(depth)
                        .checked_sub(1)
                        .and_then(|index| parent.maybe_child(index)),
                };
                if let Some(sibling) = sibling {
                    next = Some(sibling.clone());
                    break;
                }
                if depth == 0 {
                    return None;
                }
                pos = dir.step(pos, 1)?;
                let crossed = doc.resolve(pos).ok()?;
                if Self::is_gap_location(&crossed) {
                    return Some(crossed);
                }
            }

            let mut next = next?;
            let restart_at = loop {
                let inside = match dir {
                    Direction::Forward => next.first_child(),
                    Direction::Backward => next.last_child(),
                };
                let Some(inside) = inside.cloned() else {
                    if next.is_atom() && !next.is_text() && !NodeSelection::is_selectable(&next) {
                        break Some(dir.step(pos, next.node_size())?);
                    }
                    break None;
                };
                next = inside;
                pos = dir.step(pos, 1)?;
                let crossed = doc.resolve(pos).ok()?;
                if Self::is_gap_location(&crossed) {
                    return Some(crossed);
                }
            };

            current = doc.resolve(restart_at?).ok()?;
            must_move = false;
        }
    }
}

impl PartialEq<Selection> for GapSelection {
    fn eq(&self, other: &Selection) -> bool {
        match other {
            Selection::Gap(other) => self.anchor.pos() == other.anchor.pos() && self.head.pos() == other.head.pos(),
            _ => false,
        }
    }
}

/// Whether the content before `pos` is closed, i.e. it cannot be joined
/// with text typed at `pos`
pub fn closed_before(pos: &ResolvedPos) -> bool {
    for depth in (0..=pos.depth()).rev() {
        let index = pos.index(depth);
        if index == 0 {
            continue;
        }
        let mut before = pos.node(depth).child(index - 1).clone();
        loop {
            if is_closed(&before) {
                return true;
            }
            if before.inline_content() {
                return false;
            }
            let Some(last) = before.last_child() else {
                return true;
            };
            before = last.clone();
        }
    }
    true
}

/// Whether the content after `pos` is closed
pub fn closed_after(pos: &ResolvedPos) -> bool {
    for depth in (0..=pos.depth()).rev() {
        let index = pos.index_after(depth);
        let parent = pos.node(depth);
        if index == parent.child_count() {
            continue;
        }
        let mut after = parent.child(index).clone();
        loop {
            if is_closed(&after) {
                return true;
            }
            if after.inline_content() {
                return false;
            }
            let Some(first) = after.first_child() else {
                return true;
            };
            after = first.clone();
        }
    }
    true
}

fn is_closed(node: &Node) -> bool {
    (node.child_count() == 0 && !node.inline_content()) || node.is_atom() || node.node_type().isolating()
}
