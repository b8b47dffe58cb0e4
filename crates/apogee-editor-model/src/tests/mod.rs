use std::sync::LazyLock;

use serde_json::Value;

use crate::mark::Attrs;
use crate::node::Node;
use crate::schema::{Schema, apogee_schema};

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

pub fn blockquote(children: Vec<Node>) -> Node {
    SCHEMA.node("blockquote", None, children).unwrap()
}

pub fn text(content: &str) -> Node {
    SCHEMA.text(content, vec![]).unwrap()
}

pub fn strong(content: &str) -> Node {
    let mark = SCHEMA.mark("strong", None).unwrap();
    SCHEMA.text(content, vec![mark]).unwrap()
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

pub fn component(name: &str) -> Node {
    let mut attrs = Attrs::new();
    attrs.insert("name".to_string(), Value::from(name));
    SCHEMA.node("apogee_component", Some(attrs), vec![]).unwrap()
}
