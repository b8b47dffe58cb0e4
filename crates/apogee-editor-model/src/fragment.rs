use std::fmt;

use crate::node::Node;

/// An ordered sequence of child nodes with its cached size in position units.
///
/// Adjacent text nodes with identical marks are merged on construction.
#[derive(Clone, Default, PartialEq)]
pub struct Fragment {
    children: Vec<Node>,
    size: usize,
}

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_node(node: Node) -> Self {
        Self::from_vec(vec![node])
    }

    pub fn from_vec(nodes: Vec<Node>) -> Self {
        let mut children: Vec<Node> = Vec::with_capacity(nodes.len());
        for node in nodes {
            push_joined(&mut children, node);
        }
        let size = children.iter().map(Node::node_size).sum();
        Self { children, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.children.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }

    pub fn to_vec(&self) -> Vec<Node> {
        self.children.clone()
    }

    /// Find the child index at a position inside this fragment.
    ///
    /// Returns `(index, offset)` where `offset` is the start of that child.
    /// A position on a boundary between two children resolves to the later one.
    pub fn find_index(&self, pos: usize) -> (usize, usize) {
        if pos == 0 {
            return (0, 0);
        }
        if pos >= self.size {
            return (self.children.len(), self.size);
        }
        let mut cur = 0;
        for (i, child) in self.children.iter().enumerate() {
            let end = cur + child.node_size();
            if end >= pos {
                if end == pos {
                    return (i + 1, end);
                }
                return (i, cur);
            }
            cur = end;
        }
        (self.children.len(), self.size)
    }

    /// The part of this fragment between two positions
    pub fn cut(&self, from: usize, to: usize) -> Fragment {
        let to = to.min(self.size);
        if from == 0 && to == self.size {
            return self.clone();
        }
        let mut result = Vec::new();
        if to > from {
            let mut pos = 0;
            for child in &self.children {
                if pos >= to {
                    break;
                }
                let end = pos + child.node_size();
                if end > from {
                    if pos < from || end > to {
                        let cut = if child.is_text() {
                            child.cut(from.saturating_sub(pos), (to - pos).min(child.node_size()))
                        } else {
                            child.cut(
                                from.saturating_sub(pos + 1),
                                (to.saturating_sub(pos + 1)).min(child.content_size()),
                            )
                        };
                        result.push(cut);
                    } else {
                        result.push(child.clone());
                    }
                }
                pos = end;
            }
        }
        Fragment::from_vec(result)
    }

    pub fn append(&self, other: &Fragment) -> Fragment {
        if other.size == 0 {
            return self.clone();
        }
        if self.size == 0 {
            return other.clone();
        }
        let mut nodes = self.children.clone();
        nodes.extend(other.children.iter().cloned());
        Fragment::from_vec(nodes)
    }

    pub fn replace_child(&self, index: usize, node: Node) -> Fragment {
        let mut nodes = self.children.clone();
        if let Some(slot) = nodes.get_mut(index) {
            *slot = node;
        }
        Fragment::from_vec(nodes)
    }

    pub(crate) fn nodes_between<F>(&self, from: usize, to: usize, f: &mut F, node_start: usize, parent: Option<&Node>)
    where
        F: FnMut(&Node, usize, Option<&Node>, usize) -> bool,
    {
        let mut pos = 0;
        for (i, child) in self.children.iter().enumerate() {
            if pos >= to {
                break;
            }
            let end = pos + child.node_size();
            if end > from && f(child, node_start + pos, parent, i) && child.content_size() > 0 {
                let start = pos + 1;
                child.content().nodes_between(
                    from.saturating_sub(start),
                    to.saturating_sub(start).min(child.content_size()),
                    f,
                    node_start + start,
                    Some(child),
                );
            }
            pos = end;
        }
    }
}

fn push_joined(target: &mut Vec<Node>, node: Node) {
    if let Some(last) = target.last_mut()
        && node.is_text()
        && last.is_text()
        && node.same_markup(last)
    {
        let joined = format!("{}{}", last.text().unwrap_or_default(), node.text().unwrap_or_default());
        *last = last.with_text(joined);
        return;
    }
    target.push(node);
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ">")
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
