use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::fragment::Fragment;
use crate::mark::{Attrs, Mark};
use crate::replace::{self, Slice};
use crate::resolved_pos::ResolvedPos;
use crate::schema::NodeType;

struct NodeData {
    node_type: NodeType,
    attrs: Attrs,
    content: Fragment,
    text: Option<String>,
    marks: Vec<Mark>,
}

/// An immutable document node. Cloning shares the underlying tree.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    pub(crate) fn new(node_type: NodeType, attrs: Attrs, content: Fragment, marks: Vec<Mark>) -> Self {
        Self(Arc::new(NodeData {
            node_type,
            attrs,
            content,
            text: None,
            marks,
        }))
    }

    pub(crate) fn new_text(node_type: NodeType, text: String, marks: Vec<Mark>) -> Self {
        Self(Arc::new(NodeData {
            node_type,
            attrs: Attrs::new(),
            content: Fragment::empty(),
            text: Some(text),
            marks,
        }))
    }

    pub fn node_type(&self) -> &NodeType {
        &self.0.node_type
    }

    pub fn attrs(&self) -> &Attrs {
        &self.0.attrs
    }

    pub fn content(&self) -> &Fragment {
        &self.0.content
    }

    pub fn text(&self) -> Option<&str> {
        self.0.text.as_deref()
    }

    pub fn marks(&self) -> &[Mark] {
        &self.0.marks
    }

    pub fn is_text(&self) -> bool {
        self.0.node_type.is_text()
    }

    pub fn is_inline(&self) -> bool {
        self.0.node_type.is_inline()
    }

    pub fn is_block(&self) -> bool {
        self.0.node_type.is_block()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.node_type.is_leaf()
    }

    pub fn is_atom(&self) -> bool {
        self.0.node_type.is_atom()
    }

    pub fn is_textblock(&self) -> bool {
        self.0.node_type.is_textblock()
    }

    pub fn inline_content(&self) -> bool {
        self.0.node_type.inline_content()
    }

    /// Size of this node in position units
    pub fn node_size(&self) -> usize {
        match &self.0.text {
            Some(text) => text.chars().count(),
            None if self.is_leaf() => 1,
            None => self.0.content.size() + 2,
        }
    }

    pub fn content_size(&self) -> usize {
        self.0.content.size()
    }

    pub fn child_count(&self) -> usize {
        self.0.content.child_count()
    }

    /// The child at `index`.
    ///
    /// Panics when `index` is out of bounds; use [`Node::maybe_child`] when the
    /// index has not been checked against [`Node::child_count`].
    pub fn child(&self, index: usize) -> &Node {
        match self.0.content.child(index) {
            Some(child) => child,
            None => panic!("index {index} out of range for {}", self.node_type().name()),
        }
    }

    pub fn maybe_child(&self, index: usize) -> Option<&Node> {
        self.0.content.child(index)
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.0.content.first_child()
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.0.content.last_child()
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        match &self.0.text {
            Some(text) => text.clone(),
            None => self.0.content.iter().map(Node::text_content).collect(),
        }
    }

    /// Same type, attributes and marks
    pub fn same_markup(&self, other: &Node) -> bool {
        self.0.node_type == other.0.node_type
            && self.0.attrs == other.0.attrs
            && Mark::same_set(&self.0.marks, &other.0.marks)
    }

    /// Copy of this node with different content, keeping its markup
    pub fn copy(&self, content: Fragment) -> Node {
        Self(Arc::new(NodeData {
            node_type: self.0.node_type.clone(),
            attrs: self.0.attrs.clone(),
            content,
            text: self.0.text.clone(),
            marks: self.0.marks.clone(),
        }))
    }

    pub fn with_text(&self, text: String) -> Node {
        Self(Arc::new(NodeData {
            node_type: self.0.node_type.clone(),
            attrs: self.0.attrs.clone(),
            content: Fragment::empty(),
            text: Some(text),
            marks: self.0.marks.clone(),
        }))
    }

    pub fn with_marks(&self, marks: Vec<Mark>) -> Node {
        Self(Arc::new(NodeData {
            node_type: self.0.node_type.clone(),
            attrs: self.0.attrs.clone(),
            content: self.0.content.clone(),
            text: self.0.text.clone(),
            marks,
        }))
    }

    /// The part of this node between two content positions (character
    /// offsets for text nodes)
    pub fn cut(&self, from: usize, to: usize) -> Node {
        if let Some(text) = &self.0.text {
            let len = text.chars().count();
            if from == 0 && to >= len {
                return self.clone();
            }
            let sliced: String = text.chars().skip(from).take(to.saturating_sub(from)).collect();
            return self.with_text(sliced);
        }
        if from == 0 && to >= self.content_size() {
            return self.clone();
        }
        self.copy(self.0.content.cut(from, to))
    }

    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, ModelError> {
        ResolvedPos::resolve(self, pos)
    }

    pub fn resolve_clamped(&self, pos: usize) -> ResolvedPos {
        ResolvedPos::resolve_clamped(self, pos)
    }

    /// Visit every descendant overlapping `from..to` with
    /// `(node, pos, parent, index)`. Returning false skips that node's children.
    pub fn nodes_between<F>(&self, from: usize, to: usize, mut f: F)
    where
        F: FnMut(&Node, usize, Option<&Node>, usize) -> bool,
    {
        self.0.content.nodes_between(from, to, &mut f, 0, Some(self));
    }

    /// Replace the range `from..to` with a slice, returning the new node
    pub fn replace(&self, from: usize, to: usize, slice: &Slice) -> Result<Node, ModelError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        replace::replace(&from, &to, slice)
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.same_markup(other)
                && self.0.text == other.0.text
                && self.0.content == other.0.content)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mark in self.marks() {
            write!(f, "{}(", mark.mark_type().name())?;
        }
        match &self.0.text {
            Some(text) => write!(f, "{text:?}")?,
            None => {
                write!(f, "{}", self.node_type().name())?;
                if self.child_count() > 0 {
                    write!(f, "(")?;
                    for (i, child) in self.0.content.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{child}")?;
                    }
                    write!(f, ")")?;
                }
            }
        }
        for _ in self.marks() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::tests::*;

    #[test]
    fn test_node_sizes() {
        let doc = doc(vec![p("ab"), hr(), p("c")]);

        assert_eq!(doc.child(0).node_size(), 4);
        assert_eq!(doc.child(1).node_size(), 1);
        assert_eq!(doc.content_size(), 8);
    }

    #[test]
    fn test_text_size_counts_chars() {
        let doc = doc(vec![p("héllo")]);
        assert_eq!(doc.child(0).child(0).node_size(), 5);
    }

    #[test]
    fn test_display_format() {
        let doc = doc(vec![p_nodes(vec![text("a"), strong("b")]), component("plot")]);
        assert_eq!(doc.to_string(), r#"doc(paragraph("a", strong("b")), apogee_component)"#);
    }

    #[test]
    fn test_adjacent_text_with_same_marks_is_joined() {
        let paragraph = p_nodes(vec![text("a"), text("b")]);
        assert_eq!(paragraph.child_count(), 1);
        assert_eq!(paragraph.text_content(), "ab");
    }

    #[test]
    fn test_cut_inside_paragraphs() {
        let doc = doc(vec![p("abc"), p("def")]);
        // From inside 'abc' (after 'a') to inside 'def' (after 'd')
        let cut = doc.cut(2, 7);
        assert_eq!(cut.to_string(), r#"doc(paragraph("bc"), paragraph("d"))"#);
    }

    #[test]
    fn test_nodes_between_visits_overlapping_nodes() {
        let doc = doc(vec![p("ab"), hr(), p("cd")]);
        let mut visited = Vec::new();

        doc.nodes_between(2, 6, |node, pos, _parent, _index| {
            visited.push((node.node_type().name().to_string(), pos));
            true
        });

        assert_eq!(
            visited,
            vec![
                ("paragraph".to_string(), 0),
                ("text".to_string(), 1),
                ("horizontal_rule".to_string(), 4),
                ("paragraph".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_nodes_between_can_skip_children() {
        let doc = doc(vec![p("ab"), p("cd")]);
        let mut count = 0;
        doc.nodes_between(0, doc.content_size(), |_, _, _, _| {
            count += 1;
            false
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(doc(vec![p("a"), hr()]), doc(vec![p("a"), hr()]));
        assert_ne!(doc(vec![p("a")]), doc(vec![p("b")]));
    }
}
