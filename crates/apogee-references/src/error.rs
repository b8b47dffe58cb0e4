#[derive(Debug, thiserror::Error)]
pub enum ReferenceViewError {
    #[error("No reference list for type {0:?}")]
    UnknownReferenceType(String),
    #[error("Reference entry {0:?} is already displayed")]
    DuplicateEntry(String),
}
