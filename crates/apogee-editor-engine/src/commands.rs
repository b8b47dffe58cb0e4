use apogee_editor_model::{Fragment, Mark, ResolvedPos, Slice};

use crate::error::TransformError;
use crate::selection::{Direction, GapSelection, Selection, TextSelection};
use crate::state::{EditorState, Transaction};

/// Editor commands that involve the gap cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    InsertText(String),
    DeleteSelection,
}

/// Run a command against `state`. `Ok(None)` means the command does not
/// apply and the host should fall back to its own handling.
pub fn run(state: &EditorState, cmd: &Cmd) -> Result<Option<Transaction>, TransformError> {
    let tr = match cmd {
        Cmd::ArrowLeft | Cmd::ArrowUp => arrow(state, Direction::Backward),
        Cmd::ArrowRight | Cmd::ArrowDown => arrow(state, Direction::Forward),
        Cmd::InsertText(text) => insert_text(state, text)?,
        Cmd::DeleteSelection => delete_selection(state)?,
    };
    log::trace!("{cmd:?} -> {}", if tr.is_some() { "applied" } else { "skipped" });
    Ok(tr)
}

/// Move onto the next gap location in `dir`
fn arrow(state: &EditorState, dir: Direction) -> Option<Transaction> {
    let sel = state.selection();
    let mut start = match dir {
        Direction::Forward => sel.resolved_to().clone(),
        Direction::Backward => sel.resolved_from().clone(),
    };
    let mut must_move = sel.empty();

    if let Selection::Text(_) = sel {
        if !at_textblock_edge(&start, dir) || start.depth() == 0 {
            return None;
        }
        must_move = false;
        let outside = match dir {
            Direction::Forward => start.after(start.depth())?,
            Direction::Backward => start.before(start.depth())?,
        };
        start = state.doc().resolve(outside).ok()?;
    }

    let found = GapSelection::find_from(&start, dir, must_move)?;
    let mut tr = state.tr();
    tr.set_selection(Selection::Gap(GapSelection::collapsed(found)));
    Some(tr)
}

fn at_textblock_edge(pos: &ResolvedPos, dir: Direction) -> bool {
    let parent = pos.parent();
    if !parent.inline_content() {
        return false;
    }
    match dir {
        Direction::Forward => pos.parent_offset() == parent.content_size(),
        Direction::Backward => pos.parent_offset() == 0,
    }
}

fn insert_text(state: &EditorState, text: &str) -> Result<Option<Transaction>, TransformError> {
    if text.is_empty() {
        return Ok(None);
    }
    let sel = state.selection();
    let marks = match state.stored_marks() {
        Some(marks) => marks.to_vec(),
        None => sel.resolved_from().marks(),
    };
    let mut tr = state.tr();

    let Selection::Gap(gap) = sel else {
        let node = state.schema().text(text, marks)?;
        sel.replace_with(&mut tr, node)?;
        return Ok(Some(tr));
    };

    // A deleted range leaves the cursor where the typed text belongs
    let pos = if gap.is_collapsed() {
        gap.from().pos()
    } else {
        gap.replace(&mut tr, Slice::empty())?;
        tr.selection().head()
    };
    let marks = tr.stored_marks().map_or(marks, <[Mark]>::to_vec);
    let node = state.schema().text(text, marks)?;
    let target = tr.doc().resolve(pos)?;

    if target.parent().inline_content() {
        tr.replace_with(pos, pos, node)?;
        let cursor = tr.doc().resolve(pos + text.chars().count())?;
        tr.set_selection(Selection::Text(TextSelection::collapsed(cursor)));
        return Ok(Some(tr));
    }

    let Some(block_type) = state.schema().default_textblock() else {
        log::debug!("schema has no textblock to type into at gap {pos}");
        return Ok(None);
    };
    let block = block_type.create(None, Fragment::from_node(node), Vec::new())?;
    tr.insert(pos, Fragment::from_node(block))?;
    let cursor = tr.doc().resolve(pos + 1 + text.chars().count())?;
    tr.set_selection(Selection::Text(TextSelection::collapsed(cursor)));
    Ok(Some(tr))
}

fn delete_selection(state: &EditorState) -> Result<Option<Transaction>, TransformError> {
    let sel = state.selection();
    if sel.empty() {
        return Ok(None);
    }
    let mut tr = state.tr();
    sel.replace(&mut tr, Slice::empty())?;
    Ok(Some(tr))
}
