//! Selections over a document.
//!
//! A selection is an immutable value holding two resolved positions, the
//! anchor (the side that stays put) and the head (the side that moves).
//! Edits never mutate a selection; they map it into a new one.

pub mod all;
pub mod bookmark;
pub mod gap;
pub mod node;
pub mod registry;
pub mod text;

use apogee_editor_model::{Mappable, Node, ResolvedPos, Slice};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SelectionError, TransformError};
use crate::state::Transaction;

pub use all::AllSelection;
pub use bookmark::{GapSelectionBookmark, SelectionBookmark};
pub use gap::{GapSelection, closed_after, closed_before, is_leaf_block};
pub use node::NodeSelection;
pub use registry::{SelectionDeserializer, SelectionRegistry};
pub use text::TextSelection;

/// Direction of a search or a cursor motion through the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Backward,
    #[default]
    Forward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Backward => Direction::Forward,
            Direction::Forward => Direction::Backward,
        }
    }

    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }

    /// Move `pos` by `distance` units, `None` when that leaves the
    /// representable range
    pub fn step(self, pos: usize, distance: usize) -> Option<usize> {
        match self {
            Direction::Forward => pos.checked_add(distance),
            Direction::Backward => pos.checked_sub(distance),
        }
    }
}

/// JSON form of the built-in selection types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SelectionJson {
    #[serde(rename = "text")]
    Text { anchor: usize, head: usize },
    #[serde(rename = "node")]
    Node { anchor: usize },
    #[serde(rename = "all")]
    All,
    #[serde(rename = "gapselection")]
    Gap { anchor: usize, head: usize },
}

#[derive(Debug, Clone)]
pub enum Selection {
    Text(TextSelection),
    Node(NodeSelection),
    All(AllSelection),
    Gap(GapSelection),
}

impl Selection {
    pub fn resolved_anchor(&self) -> &ResolvedPos {
        match self {
            Selection::Text(sel) => sel.anchor(),
            Selection::Node(sel) => sel.anchor(),
            Selection::All(sel) => sel.anchor(),
            Selection::Gap(sel) => sel.anchor(),
        }
    }

    pub fn resolved_head(&self) -> &ResolvedPos {
        match self {
            Selection::Text(sel) => sel.head(),
            Selection::Node(sel) => sel.head(),
            Selection::All(sel) => sel.head(),
            Selection::Gap(sel) => sel.head(),
        }
    }

    /// The lower bound of the selection
    pub fn resolved_from(&self) -> &ResolvedPos {
        let (anchor, head) = (self.resolved_anchor(), self.resolved_head());
        if anchor.pos() <= head.pos() { anchor } else { head }
    }

    /// The upper bound of the selection
    pub fn resolved_to(&self) -> &ResolvedPos {
        let (anchor, head) = (self.resolved_anchor(), self.resolved_head());
        if anchor.pos() <= head.pos() { head } else { anchor }
    }

    pub fn anchor(&self) -> usize {
        self.resolved_anchor().pos()
    }

    pub fn head(&self) -> usize {
        self.resolved_head().pos()
    }

    pub fn from(&self) -> usize {
        self.resolved_from().pos()
    }

    pub fn to(&self) -> usize {
        self.resolved_to().pos()
    }

    pub fn empty(&self) -> bool {
        self.from() == self.to()
    }

    /// Whether the selection should be drawn by the host view
    pub fn visible(&self) -> bool {
        match self {
            Selection::Gap(sel) => sel.visible(),
            _ => true,
        }
    }

    /// A collapsed cursor position, if this selection is one
    pub fn cursor(&self) -> Option<&ResolvedPos> {
        match self {
            Selection::Text(sel) => sel.cursor(),
            Selection::Gap(sel) => sel.cursor(),
            Selection::Node(_) | Selection::All(_) => None,
        }
    }

    /// Carry the selection across an edit. `doc` is the document after the edit.
    pub fn map<M: Mappable + ?Sized>(&self, doc: &Node, mapping: &M) -> Selection {
        match self {
            Selection::Text(sel) => sel.map(doc, mapping),
            Selection::Node(sel) => sel.map(doc, mapping),
            Selection::All(_) => Selection::All(AllSelection::new(doc)),
            Selection::Gap(sel) => sel.map(doc, mapping),
        }
    }

    /// Replace the selected content with `content`, leaving the selection
    /// at the end of the inserted content
    pub fn replace(&self, tr: &mut Transaction, content: Slice) -> Result<(), TransformError> {
        match self {
            Selection::Gap(sel) => sel.replace(tr, content),
            _ => replace_range(self.resolved_from(), self.resolved_to(), tr, content),
        }
    }

    /// Replace the selected content with a single node
    pub fn replace_with(&self, tr: &mut Transaction, node: Node) -> Result<(), TransformError> {
        let map_from = tr.steps().len();
        let bias = if node.is_inline() {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let mapping = tr.mapping().slice(map_from);
        let (from, to) = (mapping.map(self.from()), mapping.map(self.to()));
        tr.replace_with(from, to, node)?;
        selection_to_insertion_end(tr, map_from, bias);
        Ok(())
    }

    pub fn to_json(&self) -> SelectionJson {
        match self {
            Selection::Text(sel) => sel.to_json(),
            Selection::Node(sel) => sel.to_json(),
            Selection::All(_) => SelectionJson::All,
            Selection::Gap(sel) => sel.to_json(),
        }
    }

    /// Deserialize a selection through the standard registry
    pub fn from_json(doc: &Node, json: &Value) -> Result<Selection, SelectionError> {
        SelectionRegistry::global().from_json(doc, json)
    }

    pub fn get_bookmark(&self) -> SelectionBookmark {
        match self {
            Selection::Text(sel) => SelectionBookmark::Text {
                anchor: sel.anchor().pos(),
                head: sel.head().pos(),
            },
            Selection::Node(sel) => SelectionBookmark::Node {
                anchor: sel.anchor().pos(),
            },
            Selection::All(_) => SelectionBookmark::All,
            Selection::Gap(sel) => SelectionBookmark::Gap(sel.get_bookmark()),
        }
    }

    /// Find a valid cursor or selectable node position near `pos`, searching
    /// in `dir` first. Only text selections are returned when `text_only`.
    pub fn find_from(pos: &ResolvedPos, dir: Direction, text_only: bool) -> Option<Selection> {
        let doc = pos.doc();
        if pos.parent().inline_content() {
            return Some(Selection::Text(TextSelection::collapsed(pos.clone())));
        }
        let inner = find_selection_in(doc, pos.parent(), pos.pos(), pos.index(pos.depth()), dir, text_only);
        if inner.is_some() {
            return inner;
        }

        for depth in (0..pos.depth()).rev() {
            let found = match dir {
                Direction::Backward => find_selection_in(
                    doc,
                    pos.node(depth),
                    pos.before(depth + 1)?,
                    pos.index(depth),
                    dir,
                    text_only,
                ),
                Direction::Forward => find_selection_in(
                    doc,
                    pos.node(depth),
                    pos.after(depth + 1)?,
                    pos.index(depth) + 1,
                    dir,
                    text_only,
                ),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// The nearest valid selection to `pos`, preferring `bias`. Falls back to
    /// selecting the whole document.
    pub fn near(pos: &ResolvedPos, bias: Direction) -> Selection {
        Self::find_from(pos, bias, false)
            .or_else(|| Self::find_from(pos, bias.reverse(), false))
            .unwrap_or_else(|| Selection::All(AllSelection::new(pos.doc())))
    }

    pub fn at_start(doc: &Node) -> Selection {
        find_selection_in(doc, doc, 0, 0, Direction::Forward, false)
            .unwrap_or_else(|| Selection::All(AllSelection::new(doc)))
    }

    pub fn at_end(doc: &Node) -> Selection {
        find_selection_in(
            doc,
            doc,
            doc.content_size(),
            doc.child_count(),
            Direction::Backward,
            false,
        )
        .unwrap_or_else(|| Selection::All(AllSelection::new(doc)))
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Selection::Text(a), Selection::Text(b)) => {
                a.anchor().pos() == b.anchor().pos() && a.head().pos() == b.head().pos()
            }
            (Selection::Node(a), Selection::Node(b)) => a.anchor().pos() == b.anchor().pos(),
            (Selection::All(_), Selection::All(_)) => true,
            (Selection::Gap(a), other) => *a == *other,
            _ => false,
        }
    }
}

/// Look for a selection inside `node`, whose content starts at `pos`,
/// beginning at child `index` and moving in `dir`
fn find_selection_in(
    doc: &Node,
    node: &Node,
    pos: usize,
    index: usize,
    dir: Direction,
    text_only: bool,
) -> Option<Selection> {
    if node.inline_content() {
        return Some(Selection::Text(TextSelection::collapsed(doc.resolve(pos).ok()?)));
    }

    let indices: Vec<usize> = match dir {
        Direction::Forward => (index..node.child_count()).collect(),
        Direction::Backward => (0..index.min(node.child_count())).rev().collect(),
    };
    let mut pos = pos;
    for i in indices {
        let child = node.child(i);
        if !child.is_atom() {
            let inner_index = if dir.is_forward() { 0 } else { child.child_count() };
            let found = find_selection_in(doc, child, dir.step(pos, 1)?, inner_index, dir, text_only);
            if found.is_some() {
                return found;
            }
        } else if !text_only && NodeSelection::is_selectable(child) {
            let start = if dir.is_forward() {
                pos
            } else {
                pos.checked_sub(child.node_size())?
            };
            return NodeSelection::create(doc, start).ok().map(Selection::Node);
        }
        pos = dir.step(pos, child.node_size())?;
    }
    None
}

/// A document position stored under `key`. Whole-valued floats such as `3.0`
/// count; fractions, negatives and strings do not.
pub(crate) fn json_pos(json: &Value, key: &str) -> Option<usize> {
    let value = json.get(key)?;
    if let Some(pos) = value.as_u64() {
        return usize::try_from(pos).ok();
    }
    let pos = value.as_f64()?;
    (pos.is_finite() && pos >= 0.0 && pos.fract() == 0.0 && pos <= usize::MAX as f64).then_some(pos as usize)
}

/// Replace `from..to` in the transaction's document and move the selection
/// to the end of the inserted content
pub(crate) fn replace_range(
    from: &ResolvedPos,
    to: &ResolvedPos,
    tr: &mut Transaction,
    content: Slice,
) -> Result<(), TransformError> {
    let bias = insertion_bias(&content);
    let map_from = tr.steps().len();
    let mapping = tr.mapping().slice(map_from);
    let (from, to) = (mapping.map(from.pos()), mapping.map(to.pos()));
    tr.replace_range(from, to, content)?;
    selection_to_insertion_end(tr, map_from, bias);
    Ok(())
}

/// Stick to the content before the insertion point when the slice ends in
/// inline content
fn insertion_bias(content: &Slice) -> Direction {
    let mut last_node = content.content.last_child().cloned();
    let mut last_parent: Option<Node> = None;
    for _ in 0..content.open_end {
        last_parent = last_node.clone();
        last_node = last_node.as_ref().and_then(Node::last_child).cloned();
    }
    let ends_inline = match &last_node {
        Some(node) => node.is_inline(),
        None => last_parent.as_ref().is_some_and(Node::is_textblock),
    };
    if ends_inline {
        Direction::Backward
    } else {
        Direction::Forward
    }
}

fn selection_to_insertion_end(tr: &mut Transaction, start_len: usize, bias: Direction) {
    if tr.steps().len() <= start_len {
        return;
    }
    let Some(map) = tr.mapping().maps().last() else {
        return;
    };
    let mut end = None;
    map.for_each(|_, _, _, new_to| {
        if end.is_none() {
            end = Some(new_to);
        }
    });
    let Some(end) = end else {
        return;
    };
    let selection = Selection::near(&tr.doc().resolve_clamped(end), bias);
    tr.set_selection(selection);
}
