/*!
 * # apogee-editor-engine
 *
 * Editor-side logic layered over the immutable document model: selections,
 * the gap cursor, transactions and the toolbar aggregator.
 *
 * ## Gap cursor
 *
 * Regular text cursors can only live inside textblocks. Apogee pages place
 * atomic component cells directly at the document root, so there are
 * positions (between two components, or before a component at the start of
 * the page) where no text cursor can be placed. A [`GapSelection`] is a
 * selection that sits on such a position.
 *
 * ## Module Structure
 *
 * - **`selection`**: the [`Selection`] enum, its variants, bookmarks and the
 *   JSON type registry
 * - **`selection::gap`**: gap locations, the directional gap search and
 *   [`GapSelection`]
 * - **`state`**: [`EditorState`] and [`Transaction`]
 * - **`commands`**: the [`Cmd`] enum (arrow keys, text input, deletion)
 * - **`toolbar`**: selection info aggregation for toolbar items
 *
 * ## Usage
 *
 * ```rust
 * # use apogee_editor_engine::{Cmd, EditorState, Selection, run};
 * # use apogee_editor_model::{Node, apogee_schema};
 * let schema = apogee_schema();
 * let json = r#"{"type":"doc","content":[
 *     {"type":"paragraph","content":[{"type":"text","text":"a"}]},
 *     {"type":"apogee_component"}
 * ]}"#;
 * let doc = Node::from_json_str(&schema, json).unwrap();
 * let cursor = doc.resolve(2).unwrap();
 * let state = EditorState::new(schema, doc, Some(Selection::near(&cursor, Default::default())));
 *
 * // Leaving the paragraph forward lands on the gap before the component
 * let tr = run(&state, &Cmd::ArrowRight).unwrap().unwrap();
 * let state = state.apply(tr);
 * assert!(matches!(state.selection(), Selection::Gap(_)));
 * assert_eq!(state.selection().head(), 3);
 * ```
 */

pub mod commands;
pub mod error;
pub mod selection;
pub mod state;
pub mod toolbar;

#[cfg(test)]
pub(crate) mod tests;

pub use commands::{Cmd, run};
pub use error::{SelectionError, TransformError};
pub use selection::{
    AllSelection, Direction, GapSelection, GapSelectionBookmark, NodeSelection, Selection,
    SelectionBookmark, SelectionJson, SelectionRegistry, TextSelection,
};
pub use state::{EditorState, ReplaceStep, Transaction};
pub use toolbar::{
    BlockInfo, BlockTypeItem, MarkInfo, MarkSelectionGenerator, MarkStatus, MarkToggleItem, SelectionInfo, Toolbar,
    ToolbarItem,
};
