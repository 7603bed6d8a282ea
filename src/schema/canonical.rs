//! Parsing Canonical Form rendering.
//!
//! The canonical form strips everything that does not affect reader
//! semantics: docs, aliases, field defaults, orders, logical annotations,
//! and unknown attributes. Names are inlined fully qualified, keys appear
//! in a fixed order, and no whitespace is emitted. Two schemas with the
//! same canonical form have the same fingerprints.

use std::collections::HashSet;
use std::fmt;

use crate::schema::registry::SchemaRegistry;
use crate::schema::types::{
    ArraySchema, EnumSchema, FixedSchema, MapSchema, RecordSchema, Schema, SchemaType, UnionSchema,
};

pub(crate) fn schema_canonical(schema: &Schema) -> String {
    let mut out = String::new();
    write_schema(&mut out, schema);
    out
}

pub(crate) fn record_canonical(record: &RecordSchema) -> String {
    let mut out = String::new();
    write_record(&mut out, record);
    out
}

pub(crate) fn enum_canonical(schema: &EnumSchema) -> String {
    let mut out = String::new();
    write_enum(&mut out, schema);
    out
}

pub(crate) fn fixed_canonical(fixed: &FixedSchema) -> String {
    let mut out = String::new();
    write_fixed(&mut out, fixed);
    out
}

pub(crate) fn array_canonical(array: &ArraySchema) -> String {
    let mut out = String::new();
    write_array(&mut out, array);
    out
}

pub(crate) fn map_canonical(map: &MapSchema) -> String {
    let mut out = String::new();
    write_map(&mut out, map);
    out
}

pub(crate) fn union_canonical(union: &UnionSchema) -> String {
    let mut out = String::new();
    write_union(&mut out, union);
    out
}

/// Identity comparison form: each named type is written in full at its
/// first occurrence and by name after that, with references inlined from
/// the registry. Two definitions of the same name compare equal under this
/// form even when one of them collapsed a nested type to a reference.
pub(crate) fn expanded_canonical(schema: &Schema, registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    write_expanded(&mut out, schema, registry, &mut seen);
    out
}

// Names and enum symbols are restricted to identifier characters, so they
// never need JSON escaping.
fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    out.push_str(text);
    out.push('"');
}

fn write_schema(out: &mut String, schema: &Schema) {
    match schema {
        Schema::Record(record) => write_record(out, record),
        Schema::Enum(inner) => write_enum(out, inner),
        Schema::Fixed(fixed) => write_fixed(out, fixed),
        Schema::Array(array) => write_array(out, array),
        Schema::Map(map) => write_map(out, map),
        Schema::Union(union) => write_union(out, union),
        // A reference renders as its target's full name, which keeps
        // rendering terminating for self-referential records.
        Schema::Ref(reference) => write_quoted(out, reference.fullname()),
        Schema::Logical(logical) => write_schema(out, logical.base()),
        primitive => write_quoted(out, primitive.schema_type().as_str()),
    }
}

fn write_record(out: &mut String, record: &RecordSchema) {
    out.push_str("{\"name\":");
    write_quoted(out, record.fullname());
    out.push_str(",\"type\":");
    if record.is_error() {
        write_quoted(out, "error");
    } else {
        write_quoted(out, SchemaType::Record.as_str());
    }
    out.push_str(",\"fields\":[");
    for (position, field) in record.fields().iter().enumerate() {
        if position > 0 {
            out.push(',');
        }
        out.push_str("{\"name\":");
        write_quoted(out, field.name());
        out.push_str(",\"type\":");
        write_schema(out, field.schema());
        out.push('}');
    }
    out.push_str("]}");
}

fn write_enum(out: &mut String, schema: &EnumSchema) {
    out.push_str("{\"name\":");
    write_quoted(out, schema.fullname());
    out.push_str(",\"type\":\"enum\",\"symbols\":[");
    for (position, symbol) in schema.symbols().iter().enumerate() {
        if position > 0 {
            out.push(',');
        }
        write_quoted(out, symbol);
    }
    out.push_str("]}");
}

fn write_fixed(out: &mut String, fixed: &FixedSchema) {
    out.push_str("{\"name\":");
    write_quoted(out, fixed.fullname());
    out.push_str(",\"type\":\"fixed\",\"size\":");
    out.push_str(&fixed.size().to_string());
    out.push('}');
}

fn write_array(out: &mut String, array: &ArraySchema) {
    out.push_str("{\"type\":\"array\",\"items\":");
    write_schema(out, array.items());
    out.push('}');
}

fn write_map(out: &mut String, map: &MapSchema) {
    out.push_str("{\"type\":\"map\",\"values\":");
    write_schema(out, map.values());
    out.push('}');
}

fn write_union(out: &mut String, union: &UnionSchema) {
    out.push('[');
    for (position, member) in union.members().iter().enumerate() {
        if position > 0 {
            out.push(',');
        }
        write_schema(out, member);
    }
    out.push(']');
}

fn write_expanded(
    out: &mut String,
    schema: &Schema,
    registry: &SchemaRegistry,
    seen: &mut HashSet<String>,
) {
    match schema {
        Schema::Record(record) => {
            if !seen.insert(record.fullname().to_string()) {
                write_quoted(out, record.fullname());
                return;
            }
            out.push_str("{\"name\":");
            write_quoted(out, record.fullname());
            out.push_str(",\"type\":");
            if record.is_error() {
                write_quoted(out, "error");
            } else {
                write_quoted(out, SchemaType::Record.as_str());
            }
            out.push_str(",\"fields\":[");
            for (position, field) in record.fields().iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                out.push_str("{\"name\":");
                write_quoted(out, field.name());
                out.push_str(",\"type\":");
                write_expanded(out, field.schema(), registry, seen);
                out.push('}');
            }
            out.push_str("]}");
        }
        Schema::Enum(inner) => {
            if !seen.insert(inner.fullname().to_string()) {
                write_quoted(out, inner.fullname());
                return;
            }
            write_enum(out, inner);
        }
        Schema::Fixed(fixed) => {
            if !seen.insert(fixed.fullname().to_string()) {
                write_quoted(out, fixed.fullname());
                return;
            }
            write_fixed(out, fixed);
        }
        Schema::Array(array) => {
            out.push_str("{\"type\":\"array\",\"items\":");
            write_expanded(out, array.items(), registry, seen);
            out.push('}');
        }
        Schema::Map(map) => {
            out.push_str("{\"type\":\"map\",\"values\":");
            write_expanded(out, map.values(), registry, seen);
            out.push('}');
        }
        Schema::Union(union) => {
            out.push('[');
            for (position, member) in union.members().iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_expanded(out, member, registry, seen);
            }
            out.push(']');
        }
        Schema::Ref(reference) => {
            if seen.contains(reference.fullname()) {
                write_quoted(out, reference.fullname());
                return;
            }
            match registry.get(reference.fullname()) {
                Some(target) => write_expanded(out, target, registry, seen),
                None => write_quoted(out, reference.fullname()),
            }
        }
        Schema::Logical(logical) => write_expanded(out, logical.base(), registry, seen),
        primitive => write_quoted(out, primitive.schema_type().as_str()),
    }
}

impl fmt::Display for Schema {
    /// Formats the schema as its Parsing Canonical Form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_form())
    }
}
