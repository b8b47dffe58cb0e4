use apogee_editor_engine::{
    Cmd, Direction, EditorState, GapSelection, Selection, SelectionError, TextSelection, run,
};
use apogee_editor_model::{Mapping, Node, StepMap, apogee_schema};
use pretty_assertions::assert_eq;

/// 0 <p> 1 Intro 6 </p> 7 <chart> 8 <page_break> 9 <table> 10 <p> 11 End 14 </p> 15
fn load_page() -> Node {
    let json = std::fs::read_to_string(format!(
        "{}/tests/fixtures/page.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    Node::from_json_str(&apogee_schema(), &json).unwrap()
}

fn state_at(doc: &Node, selection: Selection) -> EditorState {
    EditorState::new(apogee_schema(), doc.clone(), Some(selection))
}

fn gap_at(doc: &Node, pos: usize) -> Selection {
    Selection::Gap(GapSelection::collapsed(doc.resolve(pos).unwrap()))
}

fn gap_trace(doc: &Node) -> String {
    let mut lines = Vec::new();
    for pos in 0..=doc.content_size() {
        let rp = doc.resolve(pos).unwrap();
        if !GapSelection::is_gap_location(&rp) {
            continue;
        }
        let search = |dir| {
            GapSelection::find_from(&rp, dir, true).map_or_else(|| "-".to_string(), |found| found.pos().to_string())
        };
        lines.push(format!(
            "{pos}: forward {}, backward {}",
            search(Direction::Forward),
            search(Direction::Backward)
        ));
    }
    lines.join("\n")
}

#[test]
fn test_gap_locations_and_searches() {
    insta::assert_snapshot!(gap_trace(&load_page()), @r"
    7: forward -, backward -
    8: forward 9, backward -
    9: forward -, backward 8
    10: forward -, backward -
    ");
}

#[test]
fn test_arrow_out_of_paragraph_then_type() {
    let doc = load_page();
    let cursor = TextSelection::collapsed(doc.resolve(6).unwrap());
    let state = state_at(&doc, Selection::Text(cursor));

    // Right arrow at the end of "Intro" lands on the gap before the chart
    let state = state.apply(run(&state, &Cmd::ArrowRight).unwrap().unwrap());
    assert!(matches!(state.selection(), Selection::Gap(_)));
    assert_eq!(state.selection().head(), 7);
    assert!(!state.selection().visible());

    // Typing there starts a new paragraph
    let state = state.apply(run(&state, &Cmd::InsertText("Note".into())).unwrap().unwrap());
    assert_eq!(
        state.doc().to_string(),
        r#"doc(paragraph("Intro"), paragraph("Note"), apogee_component, page_break, apogee_component, paragraph("End"))"#
    );
    assert!(matches!(state.selection(), Selection::Text(_)));
    assert_eq!(state.selection().head(), 12);
}

#[test]
fn test_arrow_steps_over_page_break() {
    let doc = load_page();
    let state = state_at(&doc, gap_at(&doc, 8));

    let right = state.apply(run(&state, &Cmd::ArrowRight).unwrap().unwrap());
    assert_eq!(right.selection().head(), 9);

    let left = right.apply(run(&right, &Cmd::ArrowLeft).unwrap().unwrap());
    assert_eq!(left.selection().head(), 8);

    // Next to a selectable component the gap search gives way
    assert!(run(&left, &Cmd::ArrowLeft).unwrap().is_none());
}

#[test]
fn test_gap_survives_edits_elsewhere() {
    let doc = load_page();
    let state = state_at(&doc, gap_at(&doc, 9));

    let mut tr = state.tr();
    tr.delete(11, 12).unwrap();
    tr.delete(1, 2).unwrap();
    let state = state.apply(tr);

    assert!(matches!(state.selection(), Selection::Gap(_)));
    assert_eq!(state.selection().head(), 8);
}

#[test]
fn test_gap_remaps_when_neighbour_removed() {
    let doc = load_page();
    let state = state_at(&doc, gap_at(&doc, 8));

    // Removing the chart and the page break still leaves the table beside the gap
    let mut tr = state.tr();
    tr.delete(7, 9).unwrap();
    let state = state.apply(tr);
    assert!(matches!(state.selection(), Selection::Gap(_)));
    assert_eq!(state.selection().head(), 7);

    // Once every leaf block is gone the selection falls back to text
    let mut tr = state.tr();
    tr.delete(7, 8).unwrap();
    let state = state.apply(tr);
    assert_eq!(state.doc().to_string(), r#"doc(paragraph("Intro"), paragraph("End"))"#);
    assert!(matches!(state.selection(), Selection::Text(_)));
    assert_eq!(state.selection().head(), 8);
}

#[test]
fn test_only_anchor_on_gap_after_mapping() {
    let doc = load_page();
    let sel = GapSelection::new(doc.resolve(10).unwrap(), doc.resolve(13).unwrap());

    // Delete "In" from the first paragraph
    let after = doc.replace(1, 3, &Default::default()).unwrap();
    let mapped = sel.map(&after, &Mapping::from_maps(vec![StepMap::replace(1, 2, 0)]));

    let Selection::Gap(gap) = &mapped else {
        panic!("expected gap selection, got {mapped:?}");
    };
    assert_eq!((gap.anchor().pos(), gap.head().pos()), (8, 11));
    assert!(gap.anchor_is_gap());
    assert!(!gap.head_is_gap());
}

#[test]
fn test_json_round_trip_through_text() {
    let doc = load_page();
    let state = state_at(
        &doc,
        Selection::Gap(GapSelection::new(doc.resolve(10).unwrap(), doc.resolve(7).unwrap())),
    );

    let text = serde_json::to_string(&state.selection().to_json()).unwrap();
    assert_eq!(text, r#"{"type":"gapselection","anchor":10,"head":7}"#);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let restored = Selection::from_json(&doc, &value).unwrap();
    assert_eq!(&restored, state.selection());

    let bad: serde_json::Value = serde_json::from_str(r#"{"type":"gapselection","anchor":"3","head":3}"#).unwrap();
    assert!(matches!(
        Selection::from_json(&doc, &bad),
        Err(SelectionError::InvalidInput(_))
    ));
}

#[test]
fn test_bookmark_through_history() {
    let doc = load_page();
    let state = state_at(&doc, gap_at(&doc, 9));
    let bookmark = state.selection().get_bookmark();

    let mut tr = state.tr();
    tr.delete(1, 6).unwrap();
    let mapped = bookmark.map(tr.mapping());
    let state = state.apply(tr);

    assert_eq!(mapped.resolve(state.doc()), *state.selection());
    assert_eq!(state.selection().head(), 4);
}
