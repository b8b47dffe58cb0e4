use std::sync::LazyLock;

use apogee_editor_model::{Attrs, Mark, Node, Schema, apogee_schema};
use serde_json::Value;

use crate::selection::{Selection, TextSelection};
use crate::state::EditorState;

pub static SCHEMA: LazyLock<Schema> = LazyLock::new(apogee_schema);

pub fn doc(children: Vec<Node>) -> Node {
    SCHEMA.node("doc", None, children).unwrap()
}

pub fn p(content: &str) -> Node {
    if content.is_empty() {
        p_nodes(vec![])
    } else {
        p_nodes(vec![text(content)])
    }
}

pub fn p_nodes(children: Vec<Node>) -> Node {
    SCHEMA.node("paragraph", None, children).unwrap()
}

pub fn heading(content: &str) -> Node {
    SCHEMA.node("heading", None, vec![text(content)]).unwrap()
}

pub fn blockquote(children: Vec<Node>) -> Node {
    SCHEMA.node("blockquote", None, children).unwrap()
}

pub fn callout(children: Vec<Node>) -> Node {
    SCHEMA.node("callout", None, children).unwrap()
}

pub fn text(content: &str) -> Node {
    SCHEMA.text(content, vec![]).unwrap()
}

pub fn strong_mark() -> Mark {
    SCHEMA.mark("strong", None).unwrap()
}

pub fn strong(content: &str) -> Node {
    SCHEMA.text(content, vec![strong_mark()]).unwrap()
}

pub fn link(content: &str, href: &str) -> Node {
    let mut attrs = Attrs::new();
    attrs.insert("href".to_string(), Value::from(href));
    let mark = SCHEMA.mark("link", Some(attrs)).unwrap();
    SCHEMA.text(content, vec![mark]).unwrap()
}

pub fn hr() -> Node {
    SCHEMA.node("horizontal_rule", None, vec![]).unwrap()
}

pub fn page_break() -> Node {
    SCHEMA.node("page_break", None, vec![]).unwrap()
}

pub fn image() -> Node {
    SCHEMA.node("image", None, vec![]).unwrap()
}

pub fn component(name: &str) -> Node {
    let mut attrs = Attrs::new();
    attrs.insert("name".to_string(), Value::from(name));
    SCHEMA.node("apogee_component", Some(attrs), vec![]).unwrap()
}

/// A state with a collapsed text cursor at `pos`
pub fn state_with(doc: Node, pos: usize) -> EditorState {
    let cursor = TextSelection::collapsed(doc.resolve(pos).unwrap());
    EditorState::new(SCHEMA.clone(), doc, Some(Selection::Text(cursor)))
}

/// A state with an arbitrary selection
pub fn state_with_selection(doc: Node, selection: Selection) -> EditorState {
    EditorState::new(SCHEMA.clone(), doc, Some(selection))
}
