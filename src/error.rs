//! Error types for Avro schema parsing

use std::io;
use thiserror::Error;

/// Errors that can occur while parsing and validating Avro schemas
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Input is neither valid JSON nor a bare type name
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Well-formed JSON that violates the schema structure
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// Name or namespace fails Avro naming rules
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// Full-name collision with a different prior definition
    #[error("Duplicate name: {0}")]
    DuplicateName(String),
    /// Type reference with no visible definition, or unrecognized type keyword
    #[error("Unknown type: {0}")]
    UnknownType(String),
    /// Union member constraint violation
    #[error("Invalid union: {0}")]
    InvalidUnion(String),
    /// Field default value that does not conform to the field type
    #[error("Invalid default: {0}")]
    InvalidDefault(String),
    /// IO error while reading schema files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
