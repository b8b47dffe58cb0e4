use apogee_editor_model::ModelError;

/// Errors raised while building or deserializing selections
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid input for {0}::from_json")]
    InvalidInput(&'static str),
    #[error("Unknown selection type: {0}")]
    UnknownType(String),
    #[error("No node after position {0}")]
    NoNodeAt(usize),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised while applying steps to a transaction
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Cannot apply step: {0}")]
    Model(#[from] ModelError),
}
