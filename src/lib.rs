//! Avro schema parsing, canonicalization and fingerprinting.
//!
//! This library parses Avro schema JSON into an immutable type hierarchy,
//! renders Parsing Canonical Form, and computes SHA-256 and CRC-64-AVRO
//! fingerprints for schema identity and single-object encodings.
//!
//! # Example
//! ```
//! use fuselage::{parse, SchemaType};
//!
//! let schema = parse(
//!     r#"{
//!         "type": "record",
//!         "name": "LongList",
//!         "fields": [
//!             {"name": "value", "type": "long"},
//!             {"name": "next", "type": ["null", "LongList"]}
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(schema.schema_type(), SchemaType::Record);
//! assert_eq!(
//!     schema.canonical_form(),
//!     r#"{"name":"LongList","type":"record","fields":[{"name":"value","type":"long"},{"name":"next","type":["null","LongList"]}]}"#
//! );
//! ```

pub mod error;
pub mod schema;

// Re-export main types
pub use error::SchemaError;
pub use schema::{
    must_parse, parse, parse_files, parse_with_registry, ArraySchema, EnumSchema, Field,
    FieldOrder, FixedSchema, LogicalSchema, LogicalType, MapSchema, Name, RecordSchema, RefSchema,
    Schema, SchemaRegistry, SchemaType, UnionSchema, Value,
};
