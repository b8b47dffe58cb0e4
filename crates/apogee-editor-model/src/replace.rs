//! Structural replacement of a document range with a [`Slice`].
//!
//! The range `$from..$to` may start and end at different depths. Content cut
//! open by the range is joined back together, and the slice's open sides are
//! joined onto the nodes at the range boundaries. Joins are only allowed
//! between node types with compatible content.

use crate::error::ModelError;
use crate::fragment::Fragment;
use crate::node::Node;
use crate::resolved_pos::ResolvedPos;

/// A piece of a document: a fragment plus how many levels are open on each side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
    pub content: Fragment,
    pub open_start: usize,
    pub open_end: usize,
}

impl Slice {
    pub fn new(content: Fragment, open_start: usize, open_end: usize) -> Self {
        Self {
            content,
            open_start,
            open_end,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A closed slice holding the given nodes
    pub fn closed(content: Fragment) -> Self {
        Self::new(content, 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.content.size() == 0
    }

    /// Size the slice adds to a document when inserted
    pub fn size(&self) -> usize {
        self.content.size() - self.open_start - self.open_end
    }
}

pub(crate) fn replace(from: &ResolvedPos, to: &ResolvedPos, slice: &Slice) -> Result<Node, ModelError> {
    if slice.open_start > from.depth() {
        return Err(ModelError::Replace(
            "Inserted content deeper than insertion position".to_string(),
        ));
    }
    if from.depth() - slice.open_start != to.depth().saturating_sub(slice.open_end)
        || slice.open_end > to.depth()
    {
        return Err(ModelError::Replace("Inconsistent open depths".to_string()));
    }
    replace_outer(from, to, slice, 0)
}

fn replace_outer(from: &ResolvedPos, to: &ResolvedPos, slice: &Slice, depth: usize) -> Result<Node, ModelError> {
    let index = from.index(depth);
    let node = from.node(depth);
    if index == to.index(depth) && depth < from.depth() - slice.open_start {
        let inner = replace_outer(from, to, slice, depth + 1)?;
        Ok(node.copy(node.content().replace_child(index, inner)))
    } else if slice.content.size() == 0 {
        close(node, replace_two_way(from, to, depth)?)
    } else if slice.open_start == 0 && slice.open_end == 0 && from.depth() == depth && to.depth() == depth {
        let parent = from.parent();
        let content = parent.content();
        close(
            parent,
            content
                .cut(0, from.parent_offset())
                .append(&slice.content)
                .append(&content.cut(to.parent_offset(), content.size())),
        )
    } else {
        let (start, end) = prepare_slice_for_replace(slice, from)?;
        close(node, replace_three_way(from, &start, &end, to, depth)?)
    }
}

fn check_join(main: &Node, sub: &Node) -> Result<(), ModelError> {
    if sub.node_type().compatible_content(main.node_type()) {
        Ok(())
    } else {
        Err(ModelError::Replace(format!(
            "Cannot join {} onto {}",
            sub.node_type().name(),
            main.node_type().name()
        )))
    }
}

fn joinable(before: &ResolvedPos, after: &ResolvedPos, depth: usize) -> Result<Node, ModelError> {
    let node = before.node(depth);
    check_join(node, after.node(depth))?;
    Ok(node.clone())
}

fn add_node(child: Node, target: &mut Vec<Node>) {
    if let Some(last) = target.last_mut()
        && child.is_text()
        && child.same_markup(last)
    {
        let joined = format!("{}{}", last.text().unwrap_or_default(), child.text().unwrap_or_default());
        *last = child.with_text(joined);
        return;
    }
    target.push(child);
}

fn add_range(start: Option<&ResolvedPos>, end: Option<&ResolvedPos>, depth: usize, target: &mut Vec<Node>) {
    let Some(node) = end.or(start).map(|p| p.node(depth)) else {
        return;
    };
    let mut start_index = 0;
    let end_index = end.map_or(node.child_count(), |end| end.index(depth));
    if let Some(start) = start {
        start_index = start.index(depth);
        if start.depth() > depth {
            start_index += 1;
        } else if start.text_offset() > 0 {
            if let Some(after) = start.node_after() {
                add_node(after, target);
            }
            start_index += 1;
        }
    }
    for i in start_index..end_index {
        add_node(node.child(i).clone(), target);
    }
    if let Some(end) = end
        && end.depth() == depth
        && end.text_offset() > 0
        && let Some(before) = end.node_before()
    {
        add_node(before, target);
    }
}

fn close(node: &Node, content: Fragment) -> Result<Node, ModelError> {
    node.node_type().check_content(&content)?;
    Ok(node.copy(content))
}

fn replace_three_way(
    from: &ResolvedPos,
    start: &ResolvedPos,
    end: &ResolvedPos,
    to: &ResolvedPos,
    depth: usize,
) -> Result<Fragment, ModelError> {
    let open_start = if from.depth() > depth {
        Some(joinable(from, start, depth + 1)?)
    } else {
        None
    };
    let open_end = if to.depth() > depth {
        Some(joinable(end, to, depth + 1)?)
    } else {
        None
    };

    let mut content = Vec::new();
    add_range(None, Some(from), depth, &mut content);
    match (&open_start, &open_end) {
        (Some(open_start), Some(open_end)) if start.index(depth) == end.index(depth) => {
            check_join(open_start, open_end)?;
            let inner = replace_three_way(from, start, end, to, depth + 1)?;
            add_node(close(open_start, inner)?, &mut content);
        }
        _ => {
            if let Some(open_start) = &open_start {
                add_node(close(open_start, replace_two_way(from, start, depth + 1)?)?, &mut content);
            }
            add_range(Some(start), Some(end), depth, &mut content);
            if let Some(open_end) = &open_end {
                add_node(close(open_end, replace_two_way(end, to, depth + 1)?)?, &mut content);
            }
        }
    }
    add_range(Some(to), None, depth, &mut content);
    Ok(Fragment::from_vec(content))
}

fn replace_two_way(from: &ResolvedPos, to: &ResolvedPos, depth: usize) -> Result<Fragment, ModelError> {
    let mut content = Vec::new();
    add_range(None, Some(from), depth, &mut content);
    if from.depth() > depth {
        let joined = joinable(from, to, depth + 1)?;
        add_node(close(&joined, replace_two_way(from, to, depth + 1)?)?, &mut content);
    }
    add_range(Some(to), None, depth, &mut content);
    Ok(Fragment::from_vec(content))
}

/// Wrap the slice in copies of `along`'s ancestors so its open sides can be
/// resolved like positions in a real document
fn prepare_slice_for_replace(slice: &Slice, along: &ResolvedPos) -> Result<(ResolvedPos, ResolvedPos), ModelError> {
    let extra = along.depth() - slice.open_start;
    let parent = along.node(extra);
    let mut node = parent.copy(slice.content.clone());
    for i in (0..extra).rev() {
        node = along.node(i).copy(Fragment::from_node(node));
    }
    let start = node.resolve(slice.open_start + extra)?;
    let end = node.resolve(node.content_size() - slice.open_end - extra)?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::*;

    #[test]
    fn test_delete_leaf_block() {
        let doc = doc(vec![p("a"), component("plot"), p("b")]);
        let result = doc.replace(3, 4, &Slice::empty()).unwrap();
        assert_eq!(result.to_string(), r#"doc(paragraph("a"), paragraph("b"))"#);
    }

    #[test]
    fn test_delete_text_inside_paragraph() {
        let doc = doc(vec![p("abc")]);
        let result = doc.replace(2, 3, &Slice::empty()).unwrap();
        assert_eq!(result.to_string(), r#"doc(paragraph("ac"))"#);
    }

    #[test]
    fn test_delete_across_paragraphs_joins_them() {
        let doc = doc(vec![p("ab"), p("cd")]);
        // From after 'a' to after 'c'
        let result = doc.replace(2, 6, &Slice::empty()).unwrap();
        assert_eq!(result.to_string(), r#"doc(paragraph("ad"))"#);
    }

    #[test]
    fn test_insert_closed_block_at_root() {
        let doc = doc(vec![p("a"), p("b")]);
        let slice = Slice::closed(Fragment::from_node(hr()));
        let result = doc.replace(3, 3, &slice).unwrap();
        assert_eq!(
            result.to_string(),
            r#"doc(paragraph("a"), horizontal_rule, paragraph("b"))"#
        );
    }

    #[test]
    fn test_insert_text_into_paragraph() {
        let doc = doc(vec![p("ac")]);
        let slice = Slice::closed(Fragment::from_node(text("b")));
        let result = doc.replace(2, 2, &slice).unwrap();
        assert_eq!(result.to_string(), r#"doc(paragraph("abc"))"#);
    }

    #[test]
    fn test_insert_open_slice_splits_paragraph() {
        let doc = doc(vec![p("ad")]);
        // "b</p><p>c" : a slice open one level on both sides
        let slice = Slice::new(Fragment::from_vec(vec![p("b"), p("c")]), 1, 1);
        let result = doc.replace(2, 2, &slice).unwrap();
        assert_eq!(result.to_string(), r#"doc(paragraph("ab"), paragraph("cd"))"#);
    }

    #[test]
    fn test_invalid_content_is_rejected() {
        let doc = doc(vec![p("a")]);
        let slice = Slice::closed(Fragment::from_node(hr()));
        // A horizontal rule cannot live inside a paragraph
        let result = doc.replace(1, 1, &slice);
        assert!(matches!(result, Err(ModelError::InvalidContent(_))));
    }

    #[test]
    fn test_inconsistent_open_depths() {
        let doc = doc(vec![p("a"), p("b")]);
        let slice = Slice::new(Fragment::from_vec(vec![p("x")]), 1, 0);
        let result = doc.replace(2, 2, &slice);
        assert!(matches!(result, Err(ModelError::Replace(_))));
    }

    #[test]
    fn test_slice_size() {
        let slice = Slice::new(Fragment::from_vec(vec![p("b"), p("c")]), 1, 1);
        assert_eq!(slice.size(), 4);
        assert!(Slice::empty().is_empty());
    }
}
