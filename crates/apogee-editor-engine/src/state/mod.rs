mod transaction;

use apogee_editor_model::{Mark, Node, Schema};

use crate::selection::Selection;

pub use transaction::{ReplaceStep, Transaction};

/// An immutable snapshot of the editor: document, selection and the marks
/// that the next typed text will receive
#[derive(Debug, Clone)]
pub struct EditorState {
    schema: Schema,
    doc: Node,
    selection: Selection,
    stored_marks: Option<Vec<Mark>>,
}

impl EditorState {
    /// Create a state; without an explicit selection the cursor goes to the
    /// start of the document
    pub fn new(schema: Schema, doc: Node, selection: Option<Selection>) -> Self {
        let selection = selection.unwrap_or_else(|| Selection::at_start(&doc));
        Self {
            schema,
            doc,
            selection,
            stored_marks: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stored_marks(&self) -> Option<&[Mark]> {
        self.stored_marks.as_deref()
    }

    pub fn tr(&self) -> Transaction {
        Transaction::new(self)
    }

    /// The state after `tr`. Stored marks only survive on a collapsed cursor.
    pub fn apply(&self, tr: Transaction) -> EditorState {
        let selection = tr.selection();
        let stored_marks = if selection.cursor().is_some() {
            tr.stored_marks().map(<[Mark]>::to_vec)
        } else {
            None
        };
        EditorState {
            schema: self.schema.clone(),
            doc: tr.doc().clone(),
            selection,
            stored_marks,
        }
    }
}

#[cfg(test)]
mod tests {
    use apogee_editor_model::Fragment;

    use super::*;
    use crate::selection::GapSelection;
    use crate::tests::*;

    #[test]
    fn test_default_selection_is_at_start() {
        let state = EditorState::new(SCHEMA.clone(), doc(vec![component("plot"), p("a")]), None);
        assert!(matches!(state.selection(), Selection::Node(_)));
        assert_eq!(state.selection().from(), 0);
    }

    #[test]
    fn test_apply_replaces_doc_and_selection() {
        // 0 <p> 1 a 2 </p> 3 <component> 4
        let state = state_with(doc(vec![p("a"), component("plot")]), 2);
        let mut tr = state.tr();
        tr.insert(3, Fragment::from_node(hr())).unwrap();
        let gap = GapSelection::collapsed(tr.doc().resolve(3).unwrap());
        tr.set_selection(Selection::Gap(gap));

        let next = state.apply(tr);
        assert_eq!(
            next.doc().to_string(),
            r#"doc(paragraph("a"), horizontal_rule, apogee_component)"#
        );
        assert!(matches!(next.selection(), Selection::Gap(_)));
        assert_eq!(state.doc().child_count(), 2);
    }

    #[test]
    fn test_stored_marks_dropped_for_ranges() {
        let state = state_with(doc(vec![p("ab")]), 1);
        let mut tr = state.tr();
        tr.set_selection(Selection::Text(
            crate::selection::TextSelection::create(tr.doc(), 1, 3).unwrap(),
        ));
        tr.set_stored_marks(Some(vec![strong_mark()]));

        let next = state.apply(tr);
        assert!(next.stored_marks().is_none());
    }
}
