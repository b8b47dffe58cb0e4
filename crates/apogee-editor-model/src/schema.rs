use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ModelError;
use crate::fragment::Fragment;
use crate::mark::{Attrs, Mark, MarkType};
use crate::node::Node;

/// What kind of children a node type accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Leaf node: no children at all
    Empty,
    /// Textblock: inline children (text, inline atoms)
    Inline,
    /// Container of block nodes
    Block,
    /// The text node type itself
    Text,
}

/// Declarative description of a node type, registered with a [`SchemaBuilder`]
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub name: String,
    pub content: ContentKind,
    pub inline: bool,
    pub atom: bool,
    pub isolating: bool,
    pub selectable: bool,
    pub code: bool,
    pub default_attrs: Attrs,
}

impl NodeSpec {
    /// A block-level node type with the given content kind
    pub fn new(name: impl Into<String>, content: ContentKind) -> Self {
        Self {
            name: name.into(),
            inline: content == ContentKind::Text,
            content,
            atom: false,
            isolating: false,
            selectable: true,
            code: false,
            default_attrs: Attrs::new(),
        }
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn atom(mut self) -> Self {
        self.atom = true;
        self
    }

    pub fn isolating(mut self) -> Self {
        self.isolating = true;
        self
    }

    /// Node cannot be selected as a whole (no node selection lands on it)
    pub fn unselectable(mut self) -> Self {
        self.selectable = false;
        self
    }

    pub fn code(mut self) -> Self {
        self.code = true;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, default: Value) -> Self {
        self.default_attrs.insert(key.into(), default);
        self
    }
}

/// Declarative description of a mark type
#[derive(Debug, Clone)]
pub struct MarkSpec {
    pub name: String,
    /// Whether the mark extends to text typed at its end
    pub inclusive: bool,
    pub default_attrs: Attrs,
}

impl MarkSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inclusive: true,
            default_attrs: Attrs::new(),
        }
    }

    pub fn non_inclusive(mut self) -> Self {
        self.inclusive = false;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, default: Value) -> Self {
        self.default_attrs.insert(key.into(), default);
        self
    }
}

/// A registered node type. Cheap to clone, compared by name.
#[derive(Clone)]
pub struct NodeType(Arc<NodeSpec>);

impl NodeType {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn spec(&self) -> &NodeSpec {
        &self.0
    }

    pub fn content(&self) -> ContentKind {
        self.0.content
    }

    pub fn is_text(&self) -> bool {
        self.0.content == ContentKind::Text
    }

    pub fn is_inline(&self) -> bool {
        self.0.inline
    }

    pub fn is_block(&self) -> bool {
        !self.0.inline
    }

    /// Node cannot have children
    pub fn is_leaf(&self) -> bool {
        matches!(self.0.content, ContentKind::Empty | ContentKind::Text)
    }

    /// Leaf, or declared atomic: no directly editable interior
    pub fn is_atom(&self) -> bool {
        self.is_leaf() || self.0.atom
    }

    pub fn inline_content(&self) -> bool {
        self.0.content == ContentKind::Inline
    }

    pub fn is_textblock(&self) -> bool {
        self.is_block() && self.inline_content()
    }

    pub fn isolating(&self) -> bool {
        self.0.isolating
    }

    pub fn selectable(&self) -> bool {
        self.0.selectable
    }

    /// Two types accept the same kind of children, so their contents may be joined
    pub fn compatible_content(&self, other: &NodeType) -> bool {
        self == other || self.content() == other.content()
    }

    pub fn valid_content(&self, content: &Fragment) -> bool {
        match self.0.content {
            ContentKind::Empty | ContentKind::Text => content.child_count() == 0,
            ContentKind::Inline => content.iter().all(Node::is_inline),
            ContentKind::Block => content.iter().all(Node::is_block),
        }
    }

    pub fn check_content(&self, content: &Fragment) -> Result<(), ModelError> {
        if self.valid_content(content) {
            Ok(())
        } else {
            Err(ModelError::InvalidContent(self.name().to_string()))
        }
    }

    fn compute_attrs(&self, attrs: Option<Attrs>) -> Attrs {
        let mut result = self.0.default_attrs.clone();
        if let Some(attrs) = attrs {
            result.extend(attrs);
        }
        result
    }

    /// Create a node of this type, validating its content
    pub fn create(
        &self,
        attrs: Option<Attrs>,
        content: Fragment,
        marks: Vec<Mark>,
    ) -> Result<Node, ModelError> {
        if self.is_text() {
            return Err(ModelError::InvalidContent(self.name().to_string()));
        }
        self.check_content(&content)?;
        Ok(Node::new(self.clone(), self.compute_attrs(attrs), content, marks))
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeType({})", self.name())
    }
}

/// Registry of node and mark types for one family of documents
#[derive(Debug, Clone)]
pub struct Schema {
    nodes: Vec<NodeType>,
    marks: Vec<MarkType>,
    node_index: HashMap<String, usize>,
    mark_index: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    nodes: Vec<NodeSpec>,
    marks: Vec<MarkSpec>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.nodes.push(spec);
        self
    }

    pub fn mark(mut self, spec: MarkSpec) -> Self {
        self.marks.push(spec);
        self
    }

    /// Build the schema. Duplicate type names are rejected, never overwritten.
    pub fn build(self) -> Result<Schema, ModelError> {
        let mut node_index = HashMap::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for spec in self.nodes {
            if node_index.contains_key(&spec.name) {
                return Err(ModelError::DuplicateType {
                    kind: "node",
                    name: spec.name,
                });
            }
            node_index.insert(spec.name.clone(), nodes.len());
            nodes.push(NodeType(Arc::new(spec)));
        }

        let mut mark_index = HashMap::new();
        let mut marks = Vec::with_capacity(self.marks.len());
        for (rank, spec) in self.marks.into_iter().enumerate() {
            if mark_index.contains_key(&spec.name) {
                return Err(ModelError::DuplicateType {
                    kind: "mark",
                    name: spec.name,
                });
            }
            mark_index.insert(spec.name.clone(), marks.len());
            marks.push(MarkType::new(spec, rank));
        }

        let schema = Schema {
            nodes,
            marks,
            node_index,
            mark_index,
        };
        if schema.node_type("doc").is_err() {
            return Err(ModelError::MissingType("doc"));
        }
        if !schema.node_type("text").is_ok_and(NodeType::is_text) {
            return Err(ModelError::MissingType("text"));
        }
        Ok(schema)
    }
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn node_type(&self, name: &str) -> Result<&NodeType, ModelError> {
        self.node_index
            .get(name)
            .map(|&i| &self.nodes[i])
            .ok_or_else(|| ModelError::UnknownType {
                kind: "node",
                name: name.to_string(),
            })
    }

    pub fn mark_type(&self, name: &str) -> Result<&MarkType, ModelError> {
        self.mark_index
            .get(name)
            .map(|&i| &self.marks[i])
            .ok_or_else(|| ModelError::UnknownType {
                kind: "mark",
                name: name.to_string(),
            })
    }

    pub fn node_types(&self) -> impl Iterator<Item = &NodeType> {
        self.nodes.iter()
    }

    pub fn mark_types(&self) -> impl Iterator<Item = &MarkType> {
        self.marks.iter()
    }

    /// The first registered textblock type, used when text is typed where
    /// no textblock exists yet
    pub fn default_textblock(&self) -> Option<&NodeType> {
        self.nodes.iter().find(|t| t.is_textblock() && !t.spec().code)
    }

    pub fn node(
        &self,
        name: &str,
        attrs: Option<Attrs>,
        content: Vec<Node>,
    ) -> Result<Node, ModelError> {
        self.node_type(name)?
            .create(attrs, Fragment::from_vec(content), Vec::new())
    }

    pub fn text(&self, text: &str, marks: Vec<Mark>) -> Result<Node, ModelError> {
        if text.is_empty() {
            return Err(ModelError::EmptyText);
        }
        let text_type = self.node_type("text")?.clone();
        Ok(Node::new_text(text_type, text.to_string(), Mark::normalize(marks)))
    }

    pub fn mark(&self, name: &str, attrs: Option<Attrs>) -> Result<Mark, ModelError> {
        Ok(self.mark_type(name)?.create(attrs))
    }
}

/// The schema used by Apogee workspace pages: prose blocks plus atomic
/// component cells that sit directly at the document root
pub fn apogee_schema() -> Schema {
    let built = Schema::builder()
        .node(NodeSpec::new("doc", ContentKind::Block))
        .node(NodeSpec::new("paragraph", ContentKind::Inline))
        .node(NodeSpec::new("heading", ContentKind::Inline).with_attr("level", Value::from(1)))
        .node(NodeSpec::new("blockquote", ContentKind::Block))
        .node(NodeSpec::new("code_block", ContentKind::Inline).code())
        .node(NodeSpec::new("callout", ContentKind::Block).isolating())
        .node(NodeSpec::new("horizontal_rule", ContentKind::Empty))
        .node(
            NodeSpec::new("apogee_component", ContentKind::Empty)
                .atom()
                .with_attr("name", Value::Null),
        )
        .node(NodeSpec::new("page_break", ContentKind::Empty).unselectable())
        .node(NodeSpec::new("text", ContentKind::Text))
        .node(
            NodeSpec::new("image", ContentKind::Empty)
                .inline()
                .with_attr("src", Value::Null),
        )
        .node(
            NodeSpec::new("hard_break", ContentKind::Empty)
                .inline()
                .unselectable(),
        )
        .mark(MarkSpec::new("strong"))
        .mark(MarkSpec::new("em"))
        .mark(MarkSpec::new("code"))
        .mark(
            MarkSpec::new("link")
                .non_inclusive()
                .with_attr("href", Value::Null),
        )
        .build();
    match built {
        Ok(schema) => schema,
        // The type lists above have unique names and include doc and text
        Err(e) => unreachable!("built-in schema is invalid: {e}"),
    }
}
