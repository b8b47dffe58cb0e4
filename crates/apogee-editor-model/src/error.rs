#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Position {pos} out of range (document size {size})")]
    PositionOutOfRange { pos: usize, size: usize },
    #[error("Duplicate {kind} type: {name}")]
    DuplicateType { kind: &'static str, name: String },
    #[error("Schema is missing required {0} node type")]
    MissingType(&'static str),
    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: &'static str, name: String },
    #[error("Invalid content for node {0}")]
    InvalidContent(String),
    #[error("Empty text nodes are not allowed")]
    EmptyText,
    #[error("Replace error: {0}")]
    Replace(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
