//! Avro schema types and representations.
//!
//! This module defines the closed Avro schema type system: primitives,
//! complex types, named types, references, and logical annotations. Parsed
//! graphs are immutable; composite payloads sit behind `Arc` so registry
//! entries, references, and clones share one fingerprint cache.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::schema::canonical;
use crate::schema::default::resolve_default;
use crate::schema::fingerprint::{self, FingerprintCache};
use crate::schema::name::{validate_name, Name};
use crate::schema::registry::SchemaRegistry;
use crate::schema::value::Value;

/// Type tag identifying a schema kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record,
    Enum,
    Array,
    Map,
    Union,
    Fixed,
    Ref,
}

impl SchemaType {
    /// Get the Avro name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Int => "int",
            SchemaType::Long => "long",
            SchemaType::Float => "float",
            SchemaType::Double => "double",
            SchemaType::Bytes => "bytes",
            SchemaType::String => "string",
            SchemaType::Record => "record",
            SchemaType::Enum => "enum",
            SchemaType::Array => "array",
            SchemaType::Map => "map",
            SchemaType::Union => "union",
            SchemaType::Fixed => "fixed",
            SchemaType::Ref => "ref",
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an Avro schema.
///
/// Supports all Avro primitive types, complex types, named type references,
/// and logical type annotations.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    // Primitive types
    /// Null type - no value.
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 floating-point.
    Float,
    /// 64-bit IEEE 754 floating-point.
    Double,
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,

    // Complex types
    /// Record type with named fields.
    Record(Arc<RecordSchema>),
    /// Enumeration type.
    Enum(Arc<EnumSchema>),
    /// Array of items with a single schema.
    Array(Arc<ArraySchema>),
    /// Map with string keys and values of a single schema.
    Map(Arc<MapSchema>),
    /// Union of multiple schemas.
    Union(Arc<UnionSchema>),
    /// Fixed-size byte array.
    Fixed(Arc<FixedSchema>),

    /// Reference to a previously defined named type.
    Ref(Arc<RefSchema>),

    /// Logical type annotation over a primitive base.
    Logical(Arc<LogicalSchema>),
}

impl Schema {
    /// Get the type tag. A logical annotation reports its base type's tag.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Schema::Null => SchemaType::Null,
            Schema::Boolean => SchemaType::Boolean,
            Schema::Int => SchemaType::Int,
            Schema::Long => SchemaType::Long,
            Schema::Float => SchemaType::Float,
            Schema::Double => SchemaType::Double,
            Schema::Bytes => SchemaType::Bytes,
            Schema::String => SchemaType::String,
            Schema::Record(_) => SchemaType::Record,
            Schema::Enum(_) => SchemaType::Enum,
            Schema::Array(_) => SchemaType::Array,
            Schema::Map(_) => SchemaType::Map,
            Schema::Union(_) => SchemaType::Union,
            Schema::Fixed(_) => SchemaType::Fixed,
            Schema::Ref(_) => SchemaType::Ref,
            Schema::Logical(logical) => logical.base().schema_type(),
        }
    }

    /// Check if this schema is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Schema::Null
                | Schema::Boolean
                | Schema::Int
                | Schema::Long
                | Schema::Float
                | Schema::Double
                | Schema::Bytes
                | Schema::String
        )
    }

    /// Check if this schema is a named type (record, enum, or fixed).
    pub fn is_named(&self) -> bool {
        matches!(self, Schema::Record(_) | Schema::Enum(_) | Schema::Fixed(_))
    }

    /// Check if this schema is a union containing null.
    pub fn is_nullable(&self) -> bool {
        match self {
            Schema::Union(union) => union
                .members()
                .iter()
                .any(|member| matches!(member, Schema::Null)),
            _ => false,
        }
    }

    /// For a two-member nullable union, get the non-null member.
    pub fn nullable_inner(&self) -> Option<&Schema> {
        match self {
            Schema::Union(union) if union.members().len() == 2 => union
                .members()
                .iter()
                .find(|member| !matches!(member, Schema::Null)),
            _ => None,
        }
    }

    /// Get the simple name of a named type or reference, if applicable.
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Record(record) => Some(record.name()),
            Schema::Enum(inner) => Some(inner.name()),
            Schema::Fixed(fixed) => Some(fixed.name()),
            Schema::Ref(reference) => Some(reference.name()),
            _ => None,
        }
    }

    /// Get the namespace of a named type or reference, if applicable.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Schema::Record(record) => record.namespace(),
            Schema::Enum(inner) => inner.namespace(),
            Schema::Fixed(fixed) => fixed.namespace(),
            Schema::Ref(reference) => reference.namespace(),
            _ => None,
        }
    }

    /// Get the fully qualified name of a named type or reference, if
    /// applicable.
    pub fn fullname(&self) -> Option<&str> {
        match self {
            Schema::Record(record) => Some(record.fullname()),
            Schema::Enum(inner) => Some(inner.fullname()),
            Schema::Fixed(fixed) => Some(fixed.fullname()),
            Schema::Ref(reference) => Some(reference.fullname()),
            _ => None,
        }
    }

    /// Render the Parsing Canonical Form of this schema.
    pub fn canonical_form(&self) -> String {
        canonical::schema_canonical(self)
    }

    /// SHA-256 fingerprint of the canonical form, computed once and cached.
    pub fn fingerprint(&self) -> [u8; 32] {
        match self {
            Schema::Record(record) => record.fingerprint(),
            Schema::Enum(inner) => inner.fingerprint(),
            Schema::Fixed(fixed) => fixed.fingerprint(),
            Schema::Array(array) => array.fingerprint(),
            Schema::Map(map) => map.fingerprint(),
            Schema::Union(union) => union.fingerprint(),
            Schema::Ref(reference) => reference.fingerprint(),
            Schema::Logical(logical) => logical.base().fingerprint(),
            primitive => fingerprint::primitive_digests(primitive.schema_type().as_str()).0,
        }
    }

    /// CRC-64-AVRO fingerprint of the canonical form, computed once and
    /// cached. Used by single-object encodings.
    pub fn rabin_fingerprint(&self) -> u64 {
        match self {
            Schema::Record(record) => record.rabin_fingerprint(),
            Schema::Enum(inner) => inner.rabin_fingerprint(),
            Schema::Fixed(fixed) => fixed.rabin_fingerprint(),
            Schema::Array(array) => array.rabin_fingerprint(),
            Schema::Map(map) => map.rabin_fingerprint(),
            Schema::Union(union) => union.rabin_fingerprint(),
            Schema::Ref(reference) => reference.rabin_fingerprint(),
            Schema::Logical(logical) => logical.base().rabin_fingerprint(),
            primitive => fingerprint::primitive_digests(primitive.schema_type().as_str()).1,
        }
    }

    // Aliases registered alongside the full name; named types only.
    pub(crate) fn aliases(&self) -> &[String] {
        match self {
            Schema::Record(record) => record.aliases(),
            Schema::Enum(inner) => inner.aliases(),
            Schema::Fixed(fixed) => fixed.aliases(),
            _ => &[],
        }
    }
}

/// Schema for a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    name: Name,
    doc: Option<String>,
    aliases: Vec<String>,
    fields: Vec<Field>,
    is_error: bool,
    cache: FingerprintCache,
}

impl RecordSchema {
    /// Create a record schema, validating the name and field set.
    pub fn new(
        name: &str,
        namespace: Option<&str>,
        fields: Vec<Field>,
    ) -> Result<Self, SchemaError> {
        let name = Name::new(name, namespace, None)?;
        Self::from_parts(name, None, Vec::new(), fields, false, FingerprintCache::new())
    }

    pub(crate) fn from_parts(
        name: Name,
        doc: Option<String>,
        aliases: Vec<String>,
        fields: Vec<Field>,
        is_error: bool,
        cache: FingerprintCache,
    ) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "record '{}' must have at least one field",
                name.fullname()
            )));
        }
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateName(format!(
                    "field '{}' declared twice in record '{}'",
                    field.name(),
                    name.fullname()
                )));
            }
        }
        Ok(Self {
            name,
            doc,
            aliases,
            fields,
            is_error,
            cache,
        })
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the aliases, qualifying bare aliases against this record's
    /// namespace.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Result<Self, SchemaError> {
        self.aliases = qualify_aliases(&self.name, aliases)?;
        Ok(self)
    }

    /// Mark this record as an error record.
    pub fn with_error(mut self) -> Self {
        self.is_error = true;
        self
    }

    /// Get the simple name.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    /// Get the namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> &str {
        self.name.fullname()
    }

    /// Get the documentation, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Get the aliases as fully qualified names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Get the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Whether this record was declared as an error record.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// SHA-256 fingerprint of this record's canonical form.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache
            .sha256_with(|| canonical::record_canonical(self))
    }

    /// CRC-64-AVRO fingerprint of this record's canonical form.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache.rabin_with(|| canonical::record_canonical(self))
    }

    pub(crate) fn qualified_name(&self) -> &Name {
        &self.name
    }

    pub(crate) fn cache(&self) -> &FingerprintCache {
        &self.cache
    }
}

/// A field within a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    doc: Option<String>,
    aliases: Vec<String>,
    schema: Schema,
    default: Option<Value>,
    order: FieldOrder,
}

impl Field {
    /// Create a field with the given name and schema.
    pub fn new(name: &str, schema: Schema) -> Result<Self, SchemaError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            doc: None,
            aliases: Vec::new(),
            schema,
            default: None,
            order: FieldOrder::Ascending,
        })
    }

    pub(crate) fn from_parts(
        name: String,
        doc: Option<String>,
        aliases: Vec<String>,
        schema: Schema,
        default: Option<Value>,
        order: FieldOrder,
    ) -> Self {
        Self {
            name,
            doc,
            aliases,
            schema,
            default,
            order,
        }
    }

    /// Set the default value, coercing the JSON literal against this
    /// field's schema. Fails if the literal does not conform, or if the
    /// schema is a reference (references resolve only during a parse).
    pub fn with_default(mut self, default: serde_json::Value) -> Result<Self, SchemaError> {
        let resolved = resolve_default(&default, &self.schema, &SchemaRegistry::new())?;
        self.default = Some(resolved);
        Ok(self)
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the sort order.
    pub fn with_order(mut self, order: FieldOrder) -> Self {
        self.order = order;
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the documentation, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Get the field aliases.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Get the schema of the field's value.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get the coerced default value, if any. A present `Value::Null` means
    /// the field declared `"default": null`.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Get the sort order.
    pub fn order(&self) -> FieldOrder {
        self.order
    }
}

/// Field ordering for record comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    #[default]
    Ascending,
    Descending,
    Ignore,
}

/// Schema for an enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    name: Name,
    doc: Option<String>,
    aliases: Vec<String>,
    symbols: Vec<String>,
    default: Option<String>,
    cache: FingerprintCache,
}

impl EnumSchema {
    /// Create an enum schema, validating the name and symbol set.
    pub fn new(
        name: &str,
        namespace: Option<&str>,
        symbols: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let name = Name::new(name, namespace, None)?;
        Self::from_parts(name, None, Vec::new(), symbols, None, FingerprintCache::new())
    }

    pub(crate) fn from_parts(
        name: Name,
        doc: Option<String>,
        aliases: Vec<String>,
        symbols: Vec<String>,
        default: Option<String>,
        cache: FingerprintCache,
    ) -> Result<Self, SchemaError> {
        if symbols.is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "enum '{}' must have at least one symbol",
                name.fullname()
            )));
        }
        let mut seen = HashSet::new();
        for symbol in &symbols {
            validate_name(symbol)?;
            if !seen.insert(symbol.as_str()) {
                return Err(SchemaError::DuplicateName(format!(
                    "symbol '{}' declared twice in enum '{}'",
                    symbol,
                    name.fullname()
                )));
            }
        }
        if let Some(symbol) = &default {
            if !symbols.iter().any(|s| s == symbol) {
                return Err(SchemaError::InvalidDefault(format!(
                    "default '{}' is not a symbol of enum '{}'",
                    symbol,
                    name.fullname()
                )));
            }
        }
        Ok(Self {
            name,
            doc,
            aliases,
            symbols,
            default,
            cache,
        })
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the aliases, qualifying bare aliases against this enum's
    /// namespace.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Result<Self, SchemaError> {
        self.aliases = qualify_aliases(&self.name, aliases)?;
        Ok(self)
    }

    /// Set the default symbol, which must be a declared symbol.
    pub fn with_default(mut self, symbol: impl Into<String>) -> Result<Self, SchemaError> {
        let symbol = symbol.into();
        if !self.symbols.iter().any(|s| *s == symbol) {
            return Err(SchemaError::InvalidDefault(format!(
                "default '{}' is not a symbol of enum '{}'",
                symbol,
                self.fullname()
            )));
        }
        self.default = Some(symbol);
        Ok(self)
    }

    /// Get the simple name.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    /// Get the namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> &str {
        self.name.fullname()
    }

    /// Get the documentation, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Get the aliases as fully qualified names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Get the symbols in declaration order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Get the index of a symbol.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Get the default symbol, if any.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// SHA-256 fingerprint of this enum's canonical form.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache.sha256_with(|| canonical::enum_canonical(self))
    }

    /// CRC-64-AVRO fingerprint of this enum's canonical form.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache.rabin_with(|| canonical::enum_canonical(self))
    }

    pub(crate) fn qualified_name(&self) -> &Name {
        &self.name
    }

    pub(crate) fn cache(&self) -> &FingerprintCache {
        &self.cache
    }
}

/// Schema for a fixed-size byte array.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    name: Name,
    doc: Option<String>,
    aliases: Vec<String>,
    size: usize,
    logical: Option<LogicalType>,
    cache: FingerprintCache,
}

impl FixedSchema {
    /// Create a fixed schema, validating the name and size.
    pub fn new(name: &str, namespace: Option<&str>, size: usize) -> Result<Self, SchemaError> {
        let name = Name::new(name, namespace, None)?;
        Self::from_parts(name, None, Vec::new(), size, None, FingerprintCache::new())
    }

    pub(crate) fn from_parts(
        name: Name,
        doc: Option<String>,
        aliases: Vec<String>,
        size: usize,
        logical: Option<LogicalType>,
        cache: FingerprintCache,
    ) -> Result<Self, SchemaError> {
        if size == 0 {
            return Err(SchemaError::InvalidSchema(format!(
                "fixed '{}' size must be positive",
                name.fullname()
            )));
        }
        Ok(Self {
            name,
            doc,
            aliases,
            size,
            logical,
            cache,
        })
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the aliases, qualifying bare aliases against this fixed type's
    /// namespace.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Result<Self, SchemaError> {
        self.aliases = qualify_aliases(&self.name, aliases)?;
        Ok(self)
    }

    /// Get the simple name.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    /// Get the namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> &str {
        self.name.fullname()
    }

    /// Get the documentation, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Get the aliases as fully qualified names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Get the size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the logical type annotation, if any.
    pub fn logical(&self) -> Option<&LogicalType> {
        self.logical.as_ref()
    }

    /// SHA-256 fingerprint of this fixed type's canonical form.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache.sha256_with(|| canonical::fixed_canonical(self))
    }

    /// CRC-64-AVRO fingerprint of this fixed type's canonical form.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache.rabin_with(|| canonical::fixed_canonical(self))
    }

    pub(crate) fn qualified_name(&self) -> &Name {
        &self.name
    }

    pub(crate) fn cache(&self) -> &FingerprintCache {
        &self.cache
    }
}

/// Schema for an array type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    items: Schema,
    cache: FingerprintCache,
}

impl ArraySchema {
    /// Create an array schema with the given item schema.
    pub fn new(items: Schema) -> Self {
        Self {
            items,
            cache: FingerprintCache::new(),
        }
    }

    /// Get the item schema.
    pub fn items(&self) -> &Schema {
        &self.items
    }

    /// SHA-256 fingerprint of this array's canonical form.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache.sha256_with(|| canonical::array_canonical(self))
    }

    /// CRC-64-AVRO fingerprint of this array's canonical form.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache.rabin_with(|| canonical::array_canonical(self))
    }
}

/// Schema for a map type with string keys.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSchema {
    values: Schema,
    cache: FingerprintCache,
}

impl MapSchema {
    /// Create a map schema with the given value schema.
    pub fn new(values: Schema) -> Self {
        Self {
            values,
            cache: FingerprintCache::new(),
        }
    }

    /// Get the value schema.
    pub fn values(&self) -> &Schema {
        &self.values
    }

    /// SHA-256 fingerprint of this map's canonical form.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache.sha256_with(|| canonical::map_canonical(self))
    }

    /// CRC-64-AVRO fingerprint of this map's canonical form.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache.rabin_with(|| canonical::map_canonical(self))
    }
}

/// Schema for a union of member schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSchema {
    members: Vec<Schema>,
    cache: FingerprintCache,
}

impl UnionSchema {
    /// Create a union schema, validating the member constraints: at least
    /// one member, no nested unions, and no two members sharing a
    /// duplicate-detection key (type tag for unnamed kinds, full name for
    /// named kinds and references).
    pub fn new(members: Vec<Schema>) -> Result<Self, SchemaError> {
        if members.is_empty() {
            return Err(SchemaError::InvalidUnion(
                "union must have at least one member".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for (position, member) in members.iter().enumerate() {
            if matches!(member, Schema::Union(_)) {
                return Err(SchemaError::InvalidUnion(format!(
                    "nested union at position {}",
                    position
                )));
            }
            let key = member_key(member);
            if !seen.insert(key.clone()) {
                return Err(SchemaError::InvalidUnion(format!(
                    "duplicate member '{}' at position {}",
                    key, position
                )));
            }
        }
        Ok(Self {
            members,
            cache: FingerprintCache::new(),
        })
    }

    /// Get the members in declaration order.
    pub fn members(&self) -> &[Schema] {
        &self.members
    }

    /// SHA-256 fingerprint of this union's canonical form.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache.sha256_with(|| canonical::union_canonical(self))
    }

    /// CRC-64-AVRO fingerprint of this union's canonical form.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache.rabin_with(|| canonical::union_canonical(self))
    }
}

/// A reference to a previously defined named schema.
///
/// A reference does not own its target; it carries the target's full name
/// and shares the target's fingerprint cells, so its fingerprints always
/// equal the target's. This is how self-referential records are expressed
/// without a pointer cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RefSchema {
    name: Name,
    cache: FingerprintCache,
}

impl RefSchema {
    /// Create a reference to a named schema, computing the target's
    /// fingerprints so the reference can serve them without the target.
    pub fn new(target: &Schema) -> Result<Self, SchemaError> {
        let (name, cache) = match target {
            Schema::Record(record) => (record.qualified_name().clone(), record.cache().clone()),
            Schema::Enum(inner) => (inner.qualified_name().clone(), inner.cache().clone()),
            Schema::Fixed(fixed) => (fixed.qualified_name().clone(), fixed.cache().clone()),
            other => {
                return Err(SchemaError::InvalidSchema(format!(
                    "only named schemas can be referenced, found {}",
                    other.schema_type()
                )));
            }
        };
        target.fingerprint();
        target.rabin_fingerprint();
        Ok(Self { name, cache })
    }

    pub(crate) fn from_parts(name: Name, cache: FingerprintCache) -> Self {
        Self { name, cache }
    }

    /// Get the simple name of the referenced schema.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    /// Get the namespace of the referenced schema, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    /// Get the fully qualified name of the referenced schema.
    pub fn fullname(&self) -> &str {
        self.name.fullname()
    }

    /// SHA-256 fingerprint, shared with the referenced schema. The cells
    /// are populated before a parsed graph is returned; a reference
    /// detached from any parse digests its own canonical form, the quoted
    /// full name.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.cache
            .sha256_with(|| format!("\"{}\"", self.name.fullname()))
    }

    /// CRC-64-AVRO fingerprint, shared with the referenced schema.
    pub fn rabin_fingerprint(&self) -> u64 {
        self.cache
            .rabin_with(|| format!("\"{}\"", self.name.fullname()))
    }
}

/// A logical type annotation over a primitive base schema.
///
/// Logical annotations on fixed types live on [`FixedSchema`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalSchema {
    base: Schema,
    logical_type: LogicalType,
}

impl LogicalSchema {
    /// Create a logical annotation, validating the base/annotation pair.
    pub fn new(base: Schema, logical_type: LogicalType) -> Result<Self, SchemaError> {
        let valid = matches!(
            (&base, &logical_type),
            (Schema::Int, LogicalType::Date)
                | (Schema::Int, LogicalType::TimeMillis)
                | (Schema::Long, LogicalType::TimeMicros)
                | (Schema::Long, LogicalType::TimestampMillis)
                | (Schema::Long, LogicalType::TimestampMicros)
                | (Schema::Long, LogicalType::LocalTimestampMillis)
                | (Schema::Long, LogicalType::LocalTimestampMicros)
                | (Schema::Bytes, LogicalType::Decimal { .. })
                | (Schema::String, LogicalType::Uuid)
        );
        if !valid {
            return Err(SchemaError::InvalidSchema(format!(
                "logical type '{}' cannot annotate type '{}'",
                logical_type.name(),
                base.schema_type()
            )));
        }
        Ok(Self { base, logical_type })
    }

    pub(crate) fn from_parts(base: Schema, logical_type: LogicalType) -> Self {
        Self { base, logical_type }
    }

    /// Get the annotated base schema.
    pub fn base(&self) -> &Schema {
        &self.base
    }

    /// Get the logical type.
    pub fn logical_type(&self) -> &LogicalType {
        &self.logical_type
    }
}

/// Logical type names with their parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalType {
    /// Decimal with precision and scale.
    Decimal { precision: u32, scale: u32 },
    /// UUID stored as a string.
    Uuid,
    /// Date (days since Unix epoch).
    Date,
    /// Time in milliseconds.
    TimeMillis,
    /// Time in microseconds.
    TimeMicros,
    /// Timestamp in milliseconds since Unix epoch.
    TimestampMillis,
    /// Timestamp in microseconds since Unix epoch.
    TimestampMicros,
    /// Duration (months, days, milliseconds) on a 12-byte fixed.
    Duration,
    /// Local timestamp in milliseconds (no timezone).
    LocalTimestampMillis,
    /// Local timestamp in microseconds (no timezone).
    LocalTimestampMicros,
}

impl LogicalType {
    /// Get the string name of the logical type.
    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::Decimal { .. } => "decimal",
            LogicalType::Uuid => "uuid",
            LogicalType::Date => "date",
            LogicalType::TimeMillis => "time-millis",
            LogicalType::TimeMicros => "time-micros",
            LogicalType::TimestampMillis => "timestamp-millis",
            LogicalType::TimestampMicros => "timestamp-micros",
            LogicalType::Duration => "duration",
            LogicalType::LocalTimestampMillis => "local-timestamp-millis",
            LogicalType::LocalTimestampMicros => "local-timestamp-micros",
        }
    }
}

fn qualify_aliases(name: &Name, aliases: &[&str]) -> Result<Vec<String>, SchemaError> {
    aliases
        .iter()
        .map(|alias| name.qualify_alias(alias))
        .collect()
}

/// Union duplicate-detection key: full name for named kinds and
/// references, type tag for everything else.
fn member_key(schema: &Schema) -> String {
    match schema {
        Schema::Record(record) => record.fullname().to_string(),
        Schema::Enum(inner) => inner.fullname().to_string(),
        Schema::Fixed(fixed) => fixed.fullname().to_string(),
        Schema::Ref(reference) => reference.fullname().to_string(),
        Schema::Logical(logical) => member_key(logical.base()),
        other => other.schema_type().as_str().to_string(),
    }
}
