use apogee_editor_model::{Fragment, Mappable, Mapping, Mark, Node, ResolvedPos, Slice, StepMap};

use crate::error::TransformError;
use crate::selection::Selection;
use crate::state::EditorState;

/// Replace `from..to` with a slice
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceStep {
    pub from: usize,
    pub to: usize,
    pub slice: Slice,
}

impl ReplaceStep {
    pub fn new(from: usize, to: usize, slice: Slice) -> Self {
        Self { from, to, slice }
    }

    pub fn apply(&self, doc: &Node) -> Result<Node, TransformError> {
        Ok(doc.replace(self.from, self.to, &self.slice)?)
    }

    pub fn get_map(&self) -> StepMap {
        StepMap::replace(self.from, self.to - self.from, self.slice.size())
    }
}

/// A group of steps applied to an editor state, together with the selection
/// and stored marks they produce
#[derive(Debug, Clone)]
pub struct Transaction {
    before: Node,
    doc: Node,
    steps: Vec<ReplaceStep>,
    mapping: Mapping,
    selection: Selection,
    /// Number of steps `selection` already accounts for
    selection_for: usize,
    selection_set: bool,
    stored_marks: Option<Vec<Mark>>,
    stored_marks_set: bool,
}

impl Transaction {
    pub fn new(state: &EditorState) -> Self {
        Self {
            before: state.doc().clone(),
            doc: state.doc().clone(),
            steps: Vec::new(),
            mapping: Mapping::new(),
            selection: state.selection().clone(),
            selection_for: 0,
            selection_set: false,
            stored_marks: state.stored_marks().map(<[Mark]>::to_vec),
            stored_marks_set: false,
        }
    }

    /// The document before any step of this transaction
    pub fn before(&self) -> &Node {
        &self.before
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn steps(&self) -> &[ReplaceStep] {
        &self.steps
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// The current selection, mapped through every step added since it was set
    pub fn selection(&self) -> Selection {
        if self.selection_for < self.steps.len() {
            self.selection.map(&self.doc, &self.mapping.slice(self.selection_for))
        } else {
            self.selection.clone()
        }
    }

    pub fn selection_set(&self) -> bool {
        self.selection_set
    }

    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = selection;
        self.selection_for = self.steps.len();
        self.selection_set = true;
        self.stored_marks = None;
        self.stored_marks_set = false;
        self
    }

    pub fn stored_marks(&self) -> Option<&[Mark]> {
        self.stored_marks.as_deref()
    }

    pub fn stored_marks_set(&self) -> bool {
        self.stored_marks_set
    }

    pub fn set_stored_marks(&mut self, marks: Option<Vec<Mark>>) -> &mut Self {
        self.stored_marks = marks;
        self.stored_marks_set = true;
        self
    }

    /// Make `marks` the stored marks unless they already match the marks
    /// that text typed at the selection would get
    pub fn ensure_marks(&mut self, marks: Vec<Mark>) -> &mut Self {
        let current = match &self.stored_marks {
            Some(stored) => stored.clone(),
            None => self.selection().resolved_from().marks(),
        };
        if !Mark::same_set(&current, &marks) {
            self.set_stored_marks(Some(marks));
        }
        self
    }

    pub fn replace(&mut self, from: usize, to: usize, slice: Slice) -> Result<&mut Self, TransformError> {
        if from == to && slice.is_empty() {
            return Ok(self);
        }
        self.step(ReplaceStep::new(from, to, slice))
    }

    /// Replace `from..to` with a closed slice even when the ends sit at
    /// different depths. The slice is opened on the deeper side with empty
    /// copies of that side's ancestors, so the cut node joins onto them.
    pub fn replace_range(&mut self, from: usize, to: usize, slice: Slice) -> Result<&mut Self, TransformError> {
        let (start, end) = (self.doc.resolve(from)?, self.doc.resolve(to)?);
        if start.depth() == end.depth() || slice.open_start != 0 || slice.open_end != 0 {
            return self.replace(from, to, slice);
        }

        let fitted = if end.depth() > start.depth() {
            let tail = ancestor_chain(&end, start.depth());
            Slice::new(slice.content.append(&tail), 0, end.depth() - start.depth())
        } else {
            let head = ancestor_chain(&start, end.depth());
            Slice::new(head.append(&slice.content), start.depth() - end.depth(), 0)
        };
        log::trace!("fitted {from}..{to} across depths {} and {}", start.depth(), end.depth());
        self.step(ReplaceStep::new(from, to, fitted))
    }

    pub fn replace_with(&mut self, from: usize, to: usize, node: Node) -> Result<&mut Self, TransformError> {
        self.replace(from, to, Slice::closed(Fragment::from_node(node)))
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, TransformError> {
        self.replace(from, to, Slice::empty())
    }

    pub fn insert(&mut self, pos: usize, content: Fragment) -> Result<&mut Self, TransformError> {
        self.replace(pos, pos, Slice::closed(content))
    }

    pub fn step(&mut self, step: ReplaceStep) -> Result<&mut Self, TransformError> {
        let doc = step.apply(&self.doc)?;
        log::trace!("step {}..{} (+{})", step.from, step.to, step.slice.size());
        self.mapping.append_map(step.get_map());
        self.steps.push(step);
        self.doc = doc;
        self.stored_marks = None;
        self.stored_marks_set = false;
        Ok(self)
    }

    /// Map a position from the starting document to the current one
    pub fn map_pos(&self, pos: usize) -> usize {
        self.mapping.map(pos)
    }
}

/// Empty copies of the nodes around `pos` below `depth`, nested outermost first
fn ancestor_chain(pos: &ResolvedPos, depth: usize) -> Fragment {
    let mut inner = Fragment::empty();
    for d in (depth + 1..=pos.depth()).rev() {
        inner = Fragment::from_node(pos.node(d).copy(inner));
    }
    inner
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::selection::{GapSelection, TextSelection};
    use crate::tests::*;

    #[test]
    fn test_steps_update_doc_and_mapping() {
        // 0 <p> 1 a 2 </p> 3 <component> 4 <p> 5 b 6 </p> 7
        let state = state_with(doc(vec![p("a"), component("plot"), p("b")]), 5);
        let mut tr = state.tr();
        tr.insert(1, Fragment::from_node(text("xy"))).unwrap();

        assert!(tr.doc_changed());
        assert_eq!(tr.doc().to_string(), r#"doc(paragraph("xya"), apogee_component, paragraph("b"))"#);
        assert_eq!(tr.map_pos(5), 7);
        assert_eq!(tr.before().to_string(), state.doc().to_string());
    }

    #[test]
    fn test_selection_is_mapped_lazily() {
        let state = state_with(doc(vec![p("a"), component("plot"), p("b")]), 5);
        let mut tr = state.tr();
        tr.delete(3, 4).unwrap();

        let sel = tr.selection();
        assert!(matches!(sel, Selection::Text(_)));
        assert_eq!(sel.head(), 4);
        assert!(!tr.selection_set());
    }

    #[test]
    fn test_set_selection_is_not_remapped_by_earlier_steps() {
        let state = state_with(doc(vec![p("a"), component("plot")]), 1);
        let mut tr = state.tr();
        tr.insert(4, Fragment::from_node(hr())).unwrap();
        let gap = GapSelection::collapsed(tr.doc().resolve(4).unwrap());
        tr.set_selection(Selection::Gap(gap));

        assert_eq!(tr.selection().head(), 4);
        assert!(tr.selection_set());
    }

    #[test]
    fn test_empty_replace_adds_no_step() {
        let state = state_with(doc(vec![p("a")]), 1);
        let mut tr = state.tr();
        tr.replace(2, 2, Slice::empty()).unwrap();
        assert!(!tr.doc_changed());
    }

    #[test]
    fn test_replace_range_joins_deeper_end() {
        // 0 <p> 1 a 2 </p> 3 <component> 4 <p> 5 b 6 </p> 7
        let state = state_with(doc(vec![p("a"), component("plot"), p("b")]), 1);
        let mut tr = state.tr();
        tr.replace_range(3, 6, Slice::empty()).unwrap();

        assert_eq!(tr.doc().to_string(), r#"doc(paragraph("a"), paragraph())"#);
        assert_eq!(tr.map_pos(7), 5);
    }

    #[test]
    fn test_replace_range_joins_deeper_start() {
        let state = state_with(doc(vec![p("a"), component("plot"), p("b")]), 1);
        let mut tr = state.tr();
        tr.replace_range(1, 4, Slice::empty()).unwrap();

        assert_eq!(tr.doc().to_string(), r#"doc(paragraph(), paragraph("b"))"#);
    }

    #[test]
    fn test_replace_range_keeps_closed_content() {
        let state = state_with(doc(vec![p("a"), component("plot"), p("b")]), 1);
        let mut tr = state.tr();
        tr.replace_range(3, 5, Slice::closed(Fragment::from_node(hr()))).unwrap();

        assert_eq!(
            tr.doc().to_string(),
            r#"doc(paragraph("a"), horizontal_rule, paragraph("b"))"#
        );
    }

    #[test]
    fn test_plain_replace_rejects_mismatched_depths() {
        let state = state_with(doc(vec![p("a"), component("plot"), p("b")]), 1);
        let mut tr = state.tr();
        assert!(tr.replace(3, 6, Slice::empty()).is_err());
        assert!(!tr.doc_changed());
    }

    #[test]
    fn test_failed_step_leaves_transaction_untouched() {
        let state = state_with(doc(vec![p("a")]), 1);
        let mut tr = state.tr();
        let result = tr.insert(1, Fragment::from_node(hr()));
        assert!(matches!(result, Err(TransformError::Model(_))));
        assert!(!tr.doc_changed());
    }

    #[test]
    fn test_ensure_marks_only_when_different() {
        let state = state_with(doc(vec![p_nodes(vec![strong("ab")])]), 2);
        let mut tr = state.tr();

        tr.ensure_marks(vec![strong_mark()]);
        assert!(!tr.stored_marks_set());

        tr.ensure_marks(vec![]);
        assert!(tr.stored_marks_set());
        assert_eq!(tr.stored_marks(), Some(&[][..]));
    }

    #[test]
    fn test_set_selection_clears_stored_marks() {
        let doc = doc(vec![p("ab")]);
        let state = state_with(doc, 1);
        let mut tr = state.tr();
        tr.set_stored_marks(Some(vec![strong_mark()]));
        let cursor = TextSelection::collapsed(tr.doc().resolve(2).unwrap());
        tr.set_selection(Selection::Text(cursor));
        assert!(tr.stored_marks().is_none());
    }
}
