use std::fmt;

use crate::error::ModelError;
use crate::mark::Mark;
use crate::node::Node;

#[derive(Clone)]
struct PathEntry {
    node: Node,
    /// Index of the child that contains (or follows) the position
    index: usize,
    /// Absolute position where that child starts
    offset: usize,
}

/// A position in a document together with the full path of ancestors
/// that contain it.
///
/// Depth 0 is the document itself; `depth()` is the depth of the innermost
/// ancestor ([`ResolvedPos::parent`]) whose content holds the position.
#[derive(Clone)]
pub struct ResolvedPos {
    pos: usize,
    path: Vec<PathEntry>,
    parent_offset: usize,
}

impl ResolvedPos {
    pub fn resolve(doc: &Node, pos: usize) -> Result<Self, ModelError> {
        let size = doc.content_size();
        if pos > size {
            return Err(ModelError::PositionOutOfRange { pos, size });
        }
        Ok(Self::resolve_in_range(doc, pos))
    }

    /// Resolve `pos`, clamping it to the document's content size
    pub fn resolve_clamped(doc: &Node, pos: usize) -> Self {
        Self::resolve_in_range(doc, pos.min(doc.content_size()))
    }

    fn resolve_in_range(doc: &Node, pos: usize) -> Self {
        let mut path = Vec::new();
        let mut start = 0;
        let mut parent_offset = pos;
        let mut node = doc.clone();
        loop {
            let (index, offset) = node.content().find_index(parent_offset);
            let rem = parent_offset - offset;
            path.push(PathEntry {
                node: node.clone(),
                index,
                offset: start + offset,
            });
            if rem == 0 {
                break;
            }
            let child = node.child(index).clone();
            if child.is_text() {
                break;
            }
            parent_offset = rem - 1;
            start += offset + 1;
            node = child;
        }

        Self {
            pos,
            path,
            parent_offset,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Offset of the position inside its parent's content
    pub fn parent_offset(&self) -> usize {
        self.parent_offset
    }

    /// The ancestor node at the given depth. Panics if `depth > self.depth()`.
    pub fn node(&self, depth: usize) -> &Node {
        &self.path[depth].node
    }

    pub fn parent(&self) -> &Node {
        self.node(self.depth())
    }

    pub fn doc(&self) -> &Node {
        self.node(0)
    }

    /// Index into the ancestor at `depth` of the child holding the position
    pub fn index(&self, depth: usize) -> usize {
        self.path[depth].index
    }

    /// Index pointing after this position into the ancestor at `depth`
    pub fn index_after(&self, depth: usize) -> usize {
        let skip = if depth == self.depth() && self.text_offset() == 0 {
            0
        } else {
            1
        };
        self.index(depth) + skip
    }

    /// Absolute position where the content of the ancestor at `depth` starts
    pub fn start(&self, depth: usize) -> usize {
        if depth == 0 {
            0
        } else {
            self.path[depth - 1].offset + 1
        }
    }

    pub fn end(&self, depth: usize) -> usize {
        self.start(depth) + self.node(depth).content_size()
    }

    /// Position directly before the ancestor at `depth`; the document itself
    /// (depth 0) has no position before it
    pub fn before(&self, depth: usize) -> Option<usize> {
        if depth == 0 {
            None
        } else if depth == self.depth() + 1 {
            Some(self.pos)
        } else {
            Some(self.path[depth - 1].offset)
        }
    }

    pub fn after(&self, depth: usize) -> Option<usize> {
        if depth == 0 {
            None
        } else if depth == self.depth() + 1 {
            Some(self.pos)
        } else {
            Some(self.path[depth - 1].offset + self.node(depth).node_size())
        }
    }

    /// Distance into the text node the position points into, zero when the
    /// position lies between nodes
    pub fn text_offset(&self) -> usize {
        self.pos - self.path[self.depth()].offset
    }

    pub fn node_after(&self) -> Option<Node> {
        let parent = self.parent();
        let index = self.index(self.depth());
        if index == parent.child_count() {
            return None;
        }
        let child = parent.child(index);
        let d_off = self.text_offset();
        if d_off > 0 {
            Some(child.cut(d_off, child.node_size()))
        } else {
            Some(child.clone())
        }
    }

    pub fn node_before(&self) -> Option<Node> {
        let parent = self.parent();
        let index = self.index(self.depth());
        let d_off = self.text_offset();
        if d_off > 0 {
            return Some(parent.child(index).cut(0, d_off));
        }
        if index == 0 {
            None
        } else {
            Some(parent.child(index - 1).clone())
        }
    }

    /// Marks that text inserted at this position would receive
    pub fn marks(&self) -> Vec<Mark> {
        let parent = self.parent();
        let index = self.index(self.depth());

        if parent.content_size() == 0 {
            return Vec::new();
        }
        if self.text_offset() > 0 {
            return parent.child(index).marks().to_vec();
        }

        let before = index.checked_sub(1).and_then(|i| parent.maybe_child(i));
        let after = parent.maybe_child(index);
        let (main, other) = match before {
            Some(before) => (Some(before), after),
            None => (after, None),
        };
        let Some(main) = main else {
            return Vec::new();
        };

        drop_non_inclusive(main.marks(), other)
    }

    /// Marks spanning from this position to `end`, or `None` when the
    /// position is not directly before inline content
    pub fn marks_across(&self, end: &ResolvedPos) -> Option<Vec<Mark>> {
        let after = self.parent().maybe_child(self.index(self.depth()))?;
        if !after.is_inline() {
            return None;
        }
        let next = end.parent().maybe_child(end.index(end.depth()));
        Some(drop_non_inclusive(after.marks(), next))
    }

    /// Depth of the deepest ancestor that also contains `pos`
    pub fn shared_depth(&self, pos: usize) -> usize {
        (1..=self.depth())
            .rev()
            .find(|&depth| self.start(depth) <= pos && self.end(depth) >= pos)
            .unwrap_or(0)
    }
}

fn drop_non_inclusive(marks: &[Mark], other: Option<&Node>) -> Vec<Mark> {
    marks
        .iter()
        .filter(|mark| {
            mark.mark_type().inclusive() || other.is_some_and(|other| mark.is_in_set(other.marks()))
        })
        .cloned()
        .collect()
}

impl fmt::Debug for ResolvedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.path[1..]
            .iter()
            .map(|entry| format!("{}_{}", entry.node.node_type().name(), entry.index))
            .collect();
        write!(f, "{}:{}", path.join("/"), self.parent_offset)?;
        write!(f, " @{}", self.pos)
    }
}
