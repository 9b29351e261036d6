//! Error types.

use thiserror::Error;

/// Failure to decode record operations from JSON.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid record operation: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("expected an array of record operations")]
    NotAnArray,
}

/// Failure to build or query a [`Schema`](crate::schema::Schema).
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("model '{0}' is not defined in the schema")]
    ModelNotDefined(String),
    #[error("relationship '{relationship}' is not defined for model '{model}'")]
    RelationshipNotDefined { model: String, relationship: String },
    #[error("invalid schema settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}
