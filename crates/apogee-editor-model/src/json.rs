use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::fragment::Fragment;
use crate::mark::{Attrs, Mark};
use crate::node::Node;
use crate::schema::Schema;

/// JSON form of a node: `{"type": ..., "attrs": ..., "content": [...], "text": ..., "marks": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<NodeJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<MarkJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkJson {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,
}

impl Node {
    pub fn to_json(&self) -> NodeJson {
        NodeJson {
            node_type: self.node_type().name().to_string(),
            attrs: self.attrs().clone(),
            content: self.content().iter().map(Node::to_json).collect(),
            text: self.text().map(str::to_string),
            marks: self.marks().iter().map(Mark::to_json).collect(),
        }
    }

    pub fn from_json(schema: &Schema, json: &NodeJson) -> Result<Node, ModelError> {
        let marks = json
            .marks
            .iter()
            .map(|mark| schema.mark(&mark.mark_type, Some(mark.attrs.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(text) = &json.text {
            return schema.text(text, marks);
        }

        let content = json
            .content
            .iter()
            .map(|child| Node::from_json(schema, child))
            .collect::<Result<Vec<_>, _>>()?;
        schema
            .node_type(&json.node_type)?
            .create(Some(json.attrs.clone()), Fragment::from_vec(content), marks)
    }

    pub fn from_json_str(schema: &Schema, json: &str) -> Result<Node, ModelError> {
        let parsed: NodeJson = serde_json::from_str(json)?;
        Node::from_json(schema, &parsed)
    }
}

impl Mark {
    pub fn to_json(&self) -> MarkJson {
        MarkJson {
            mark_type: self.mark_type().name().to_string(),
            attrs: self.attrs().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::apogee_schema;
    use crate::tests::*;

    #[test]
    fn test_parse_document_json() {
        let schema = apogee_schema();
        let json = r#"{
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "hi", "marks": [{"type": "em"}]}]},
                {"type": "apogee_component", "attrs": {"name": "chart"}}
            ]
        }"#;

        let doc = Node::from_json_str(&schema, json).unwrap();

        assert_eq!(doc.to_string(), r#"doc(paragraph(em("hi")), apogee_component)"#);
        assert_eq!(
            doc.child(1).attrs().get("name"),
            Some(&serde_json::Value::from("chart"))
        );
    }

    #[test]
    fn test_unknown_node_type_fails() {
        let schema = apogee_schema();
        let result = Node::from_json_str(&schema, r#"{"type": "table"}"#);
        assert!(matches!(result, Err(ModelError::UnknownType { kind: "node", .. })));
    }

    #[test]
    fn test_malformed_json_fails() {
        let schema = apogee_schema();
        let result = Node::from_json_str(&schema, "{");
        assert!(matches!(result, Err(ModelError::Json(_))));
    }

    #[test]
    fn test_to_json_omits_empty_fields() {
        let value = serde_json::to_value(hr().to_json()).unwrap();
        assert_eq!(value, serde_json::json!({"type": "horizontal_rule"}));
    }

    #[test]
    fn test_json_reconstructs_equal_document() {
        let schema = apogee_schema();
        let original = doc(vec![p_nodes(vec![text("a"), strong("b")]), component("plot"), p("c")]);

        let rebuilt = Node::from_json(&schema, &original.to_json()).unwrap();
        assert_eq!(rebuilt, original);
    }
}
