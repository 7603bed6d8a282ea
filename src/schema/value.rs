//! Typed values produced by default-value resolution.

use std::collections::HashMap;

/// A coerced Avro value, produced by resolving a JSON field default
/// against the field's schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit IEEE 754 floating-point.
    Float(f32),
    /// 64-bit IEEE 754 floating-point.
    Double(f64),
    /// Byte sequence.
    Bytes(Vec<u8>),
    /// Unicode string.
    String(String),
    /// Enum symbol.
    Enum(String),
    /// Fixed-size byte sequence.
    Fixed(Vec<u8>),
    /// Array of values.
    Array(Vec<Value>),
    /// Map from string keys to values.
    Map(HashMap<String, Value>),
    /// Record as field name/value pairs in field declaration order.
    Record(Vec<(String, Value)>),
}
