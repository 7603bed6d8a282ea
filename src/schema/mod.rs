//! Avro schema types and parsing.
//!
//! This module defines the complete Avro schema type system including
//! primitives, complex types, logical types, JSON parsing, named type
//! resolution, Parsing Canonical Form, and schema fingerprints.

mod canonical;
mod default;
mod fingerprint;
mod name;
mod parser;
mod registry;
mod types;
mod value;

pub use name::Name;
pub use parser::{must_parse, parse, parse_files, parse_with_registry};
pub use registry::SchemaRegistry;
pub use types::{
    ArraySchema, EnumSchema, Field, FieldOrder, FixedSchema, LogicalSchema, LogicalType, MapSchema,
    RecordSchema, RefSchema, Schema, SchemaType, UnionSchema,
};
pub use value::Value;
