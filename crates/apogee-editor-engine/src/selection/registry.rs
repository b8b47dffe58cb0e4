use std::collections::HashMap;
use std::sync::LazyLock;

use apogee_editor_model::Node;
use serde_json::Value;

use super::{AllSelection, GapSelection, NodeSelection, Selection, TextSelection};
use crate::error::SelectionError;

/// Builds a selection from its JSON form
pub type SelectionDeserializer = fn(&Node, &Value) -> Result<Selection, SelectionError>;

static STANDARD: LazyLock<SelectionRegistry> = LazyLock::new(SelectionRegistry::standard);

/// Table from the JSON `type` tag of a selection to its deserializer
#[derive(Debug, Default)]
pub struct SelectionRegistry {
    deserializers: HashMap<&'static str, SelectionDeserializer>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry holding every built-in selection type
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(TextSelection::JSON_ID, TextSelection::from_json);
        registry.register(NodeSelection::JSON_ID, NodeSelection::from_json);
        registry.register(AllSelection::JSON_ID, AllSelection::from_json);
        registry.register(GapSelection::JSON_ID, GapSelection::from_json);
        registry
    }

    /// Shared instance of [`SelectionRegistry::standard`]
    pub fn global() -> &'static SelectionRegistry {
        &STANDARD
    }

    /// Register a deserializer under `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is already registered. Tags are fixed at startup, so a
    /// clash is a programming error.
    pub fn register(&mut self, tag: &'static str, deserializer: SelectionDeserializer) {
        if self.deserializers.insert(tag, deserializer).is_some() {
            panic!("Duplicate use of selection JSON ID {tag}");
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.deserializers.contains_key(tag)
    }

    pub fn from_json(&self, doc: &Node, json: &Value) -> Result<Selection, SelectionError> {
        let tag = json.get("type").and_then(Value::as_str).unwrap_or_default();
        let deserializer = self
            .deserializers
            .get(tag)
            .ok_or_else(|| SelectionError::UnknownType(tag.to_string()))?;
        deserializer(doc, json)
    }
}
