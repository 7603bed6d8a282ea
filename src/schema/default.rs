//! Field default value coercion.
//!
//! Defaults appear in schema JSON as plain JSON literals. They are coerced
//! into typed [`Value`]s at parse time so a rejected default fails the
//! whole parse rather than a later read.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::SchemaError;
use crate::schema::registry::SchemaRegistry;
use crate::schema::types::Schema;
use crate::schema::value::Value;

/// Coerce a JSON default literal against a schema.
pub(crate) fn resolve_default(
    default: &JsonValue,
    schema: &Schema,
    registry: &SchemaRegistry,
) -> Result<Value, SchemaError> {
    match schema {
        Schema::Null => match default {
            JsonValue::Null => Ok(Value::Null),
            other => Err(mismatch("null", other)),
        },
        Schema::Boolean => match default {
            JsonValue::Bool(value) => Ok(Value::Boolean(*value)),
            other => Err(mismatch("boolean", other)),
        },
        Schema::Int => match default {
            JsonValue::Number(number) => {
                let wide = integral(number).ok_or_else(|| mismatch("int", default))?;
                let value = i32::try_from(wide).map_err(|_| {
                    SchemaError::InvalidDefault(format!("default {} out of range for int", wide))
                })?;
                Ok(Value::Int(value))
            }
            other => Err(mismatch("int", other)),
        },
        Schema::Long => match default {
            JsonValue::Number(number) => integral(number)
                .map(Value::Long)
                .ok_or_else(|| mismatch("long", default)),
            other => Err(mismatch("long", other)),
        },
        Schema::Float => match default {
            JsonValue::Number(number) => match number.as_f64() {
                Some(value) => Ok(Value::Float(value as f32)),
                None => Err(mismatch("float", default)),
            },
            other => Err(mismatch("float", other)),
        },
        Schema::Double => match default {
            JsonValue::Number(number) => match number.as_f64() {
                Some(value) => Ok(Value::Double(value)),
                None => Err(mismatch("double", default)),
            },
            other => Err(mismatch("double", other)),
        },
        Schema::Bytes => match default {
            JsonValue::String(text) => codepoint_bytes(text, "bytes").map(Value::Bytes),
            other => Err(mismatch("bytes", other)),
        },
        Schema::String => match default {
            JsonValue::String(text) => Ok(Value::String(text.clone())),
            other => Err(mismatch("string", other)),
        },
        Schema::Enum(inner) => match default {
            JsonValue::String(symbol) => {
                if inner.symbol_index(symbol).is_some() {
                    Ok(Value::Enum(symbol.clone()))
                } else {
                    Err(SchemaError::InvalidDefault(format!(
                        "default '{}' is not a symbol of enum '{}'",
                        symbol,
                        inner.fullname()
                    )))
                }
            }
            other => Err(mismatch("enum", other)),
        },
        Schema::Fixed(fixed) => match default {
            JsonValue::String(text) => {
                let bytes = codepoint_bytes(text, "fixed")?;
                if bytes.len() != fixed.size() {
                    return Err(SchemaError::InvalidDefault(format!(
                        "fixed '{}' default has {} bytes, expected {}",
                        fixed.fullname(),
                        bytes.len(),
                        fixed.size()
                    )));
                }
                Ok(Value::Fixed(bytes))
            }
            other => Err(mismatch("fixed", other)),
        },
        Schema::Array(array) => match default {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| resolve_default(item, array.items(), registry))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(mismatch("array", other)),
        },
        Schema::Map(map) => match default {
            JsonValue::Object(entries) => {
                let mut values = HashMap::with_capacity(entries.len());
                for (key, entry) in entries {
                    values.insert(key.clone(), resolve_default(entry, map.values(), registry)?);
                }
                Ok(Value::Map(values))
            }
            other => Err(mismatch("map", other)),
        },
        // A union default always conforms to the first member.
        Schema::Union(union) => match union.members().first() {
            Some(first) => resolve_default(default, first, registry),
            None => Err(mismatch("union", default)),
        },
        Schema::Record(record) => match default {
            JsonValue::Object(entries) => {
                let mut values = Vec::with_capacity(record.fields().len());
                for field in record.fields() {
                    let value = match entries.get(field.name()) {
                        Some(literal) => resolve_default(literal, field.schema(), registry)?,
                        None => match field.default() {
                            Some(value) => value.clone(),
                            None => {
                                return Err(SchemaError::InvalidDefault(format!(
                                    "record default is missing field '{}' of '{}'",
                                    field.name(),
                                    record.fullname()
                                )));
                            }
                        },
                    };
                    values.push((field.name().to_string(), value));
                }
                Ok(Value::Record(values))
            }
            other => Err(mismatch("record", other)),
        },
        Schema::Ref(reference) => match registry.get(reference.fullname()) {
            Some(target) => resolve_default(default, target, registry),
            None => Err(SchemaError::InvalidDefault(format!(
                "cannot coerce default against unresolved reference '{}'",
                reference.fullname()
            ))),
        },
        Schema::Logical(logical) => resolve_default(default, logical.base(), registry),
    }
}

fn mismatch(expected: &str, found: &JsonValue) -> SchemaError {
    SchemaError::InvalidDefault(format!(
        "default {} does not match type '{}'",
        found, expected
    ))
}

// Accepts integers and integer-valued floats; JSON writers commonly emit
// 1.0 for a long default.
fn integral(number: &serde_json::Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    // Values at or beyond 2^63 would saturate through the cast.
    if value.is_finite()
        && value.fract() == 0.0
        && value >= -9_223_372_036_854_775_808.0
        && value < 9_223_372_036_854_775_808.0
    {
        Some(value as i64)
    } else {
        None
    }
}

// Bytes and fixed defaults are strings whose chars are code points 0-255,
// one byte each. This is not UTF-8: "ÿ" is the single byte 0xff.
fn codepoint_bytes(text: &str, what: &str) -> Result<Vec<u8>, SchemaError> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if code > 255 {
            return Err(SchemaError::InvalidDefault(format!(
                "{} default contains code point {} outside 0-255",
                what, code
            )));
        }
        bytes.push(code as u8);
    }
    Ok(bytes)
}
