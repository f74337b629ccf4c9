//! Error types for the schema crate.

use thiserror::Error;

/// Errors that can occur while constructing or decoding a record schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A record was given an empty name.
    #[error("record name must not be empty")]
    EmptyName,

    /// Two fields of the same record share a name.
    #[error("record '{record}' contains duplicate field '{field}'")]
    DuplicateField {
        /// The record being built.
        record: String,
        /// The repeated field name.
        field: String,
    },

    /// The JSON form of a schema could not be read or written.
    #[error("schema json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
