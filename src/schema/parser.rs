//! JSON schema parser for Avro schemas.
//!
//! Parses Avro schema JSON into the [`Schema`] type hierarchy, registering
//! named types so later schema texts can refer to them by name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::schema::canonical;
use crate::schema::default::resolve_default;
use crate::schema::fingerprint::FingerprintCache;
use crate::schema::name::{validate_name, Name};
use crate::schema::registry::SchemaRegistry;
use crate::schema::types::{
    ArraySchema, EnumSchema, Field, FieldOrder, FixedSchema, LogicalSchema, LogicalType, MapSchema,
    RecordSchema, RefSchema, Schema, UnionSchema,
};

/// Parse an Avro schema from its JSON text.
///
/// A bare type name without quotes, such as `com.example.User`, is also
/// accepted, though a name can only resolve against a shared registry (see
/// [`parse_with_registry`]).
///
/// # Example
/// ```
/// use fuselage::schema::parse;
///
/// let schema = parse(r#"{"type":"array","items":"string"}"#).unwrap();
/// assert_eq!(
///     schema.canonical_form(),
///     r#"{"type":"array","items":"string"}"#
/// );
/// ```
pub fn parse(input: &str) -> Result<Schema, SchemaError> {
    let mut registry = SchemaRegistry::new();
    parse_with_registry(input, &mut registry)
}

/// Parse an Avro schema, collecting named types into `registry`.
///
/// Named types registered by earlier calls are in scope, so a schema can
/// refer to types defined in a previous text. On error the registry is
/// left unchanged.
///
/// # Example
/// ```
/// use fuselage::schema::{parse_with_registry, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// parse_with_registry(
///     r#"{"type":"fixed","name":"md5","namespace":"org.example","size":16}"#,
///     &mut registry,
/// )
/// .unwrap();
///
/// let schema = parse_with_registry(r#""org.example.md5""#, &mut registry).unwrap();
/// assert_eq!(schema.canonical_form(), r#""org.example.md5""#);
/// ```
pub fn parse_with_registry(
    input: &str,
    registry: &mut SchemaRegistry,
) -> Result<Schema, SchemaError> {
    let value = match serde_json::from_str::<JsonValue>(input) {
        Ok(value) => value,
        // serde_json rejects unquoted scalars, so a bare reference like
        // `com.example.User` arrives here as a JSON error.
        Err(err) => {
            if is_bare_name(input) {
                JsonValue::String(input.trim().to_string())
            } else {
                return Err(SchemaError::InvalidJson(err));
            }
        }
    };

    let mut staged = registry.clone();
    let mut parser = SchemaParser::new(&mut staged);
    let schema = parser.parse(&value, None)?;
    parser.warm_fingerprints();
    *registry = staged;
    Ok(schema)
}

/// Parse an Avro schema, panicking on failure.
///
/// Intended for schema literals compiled into a program.
///
/// # Panics
///
/// Panics if the input is not a valid schema.
///
/// # Example
/// ```
/// use fuselage::schema::must_parse;
///
/// let schema = must_parse(r#""long""#);
/// ```
pub fn must_parse(input: &str) -> Schema {
    match parse(input) {
        Ok(schema) => schema,
        Err(err) => panic!("invalid schema literal: {}", err),
    }
}

/// Parse schema files in order, sharing one registry so later files can
/// reference names defined in earlier ones. Returns the schema of the
/// last file.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<Schema, SchemaError> {
    let mut registry = SchemaRegistry::new();
    let mut last = None;
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let schema = parse_with_registry(&text, &mut registry)?;
        debug!(path = %path.display(), "parsed schema file");
        last = Some(schema);
    }
    last.ok_or_else(|| SchemaError::InvalidSchema("no schema files given".to_string()))
}

fn is_bare_name(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty()
        && trimmed.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        })
}

/// Single-parse state: the target registry plus the names currently being
/// defined, for turning self-references into refs that share the eventual
/// schema's fingerprint cells.
struct SchemaParser<'a> {
    registry: &'a mut SchemaRegistry,
    resolving: HashMap<String, FingerprintCache>,
}

impl<'a> SchemaParser<'a> {
    fn new(registry: &'a mut SchemaRegistry) -> Self {
        Self {
            registry,
            resolving: HashMap::new(),
        }
    }

    /// Parse a JSON value into a schema within an enclosing namespace.
    fn parse(
        &mut self,
        value: &JsonValue,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        match value {
            // A JSON null literal is the null type, same as spelling it
            // "null".
            JsonValue::Null => Ok(Schema::Null),
            JsonValue::String(name) => self.parse_type_name(name, enclosing),
            JsonValue::Object(object) => self.parse_object(object, enclosing),
            JsonValue::Array(members) => self.parse_union(members, enclosing),
            other => Err(SchemaError::InvalidSchema(format!(
                "expected a type name, object, or union, found {}",
                other
            ))),
        }
    }

    /// Parse a primitive type name or a reference to a named type.
    fn parse_type_name(
        &mut self,
        name: &str,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        if let Some(primitive) = primitive_from_name(name) {
            return Ok(primitive);
        }
        self.resolve_reference(name, enclosing)
    }

    fn resolve_reference(
        &mut self,
        name: &str,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let reference = Name::new(name, None, enclosing)?;
        if let Some(cache) = self.resolving.get(reference.fullname()) {
            // Reference to a type whose definition encloses this point.
            // Share the cells created for it so both sides agree on
            // fingerprints once the definition completes.
            let reference = RefSchema::from_parts(reference.clone(), cache.clone());
            return Ok(Schema::Ref(Arc::new(reference)));
        }
        if let Some(target) = self.registry.get(reference.fullname()) {
            let reference = RefSchema::new(target)?;
            return Ok(Schema::Ref(Arc::new(reference)));
        }
        Err(SchemaError::UnknownType(name.to_string()))
    }

    /// Parse a complex type from a JSON object.
    fn parse_object(
        &mut self,
        object: &Map<String, JsonValue>,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        match object.get("type") {
            Some(JsonValue::String(type_name)) => {
                self.parse_typed_object(object, type_name, enclosing)
            }
            // {"type": [...]} and {"type": {...}} wrap another schema.
            Some(wrapped @ (JsonValue::Array(_) | JsonValue::Object(_))) => {
                self.parse(wrapped, enclosing)
            }
            Some(other) => Err(SchemaError::InvalidSchema(format!(
                "'type' must be a string, object, or array, found {}",
                other
            ))),
            None => Err(SchemaError::InvalidSchema("missing 'type'".to_string())),
        }
    }

    fn parse_typed_object(
        &mut self,
        object: &Map<String, JsonValue>,
        type_name: &str,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        match type_name {
            "null" => Ok(Schema::Null),
            "boolean" => Ok(Schema::Boolean),
            "int" => self.with_logical(object, Schema::Int),
            "long" => self.with_logical(object, Schema::Long),
            "float" => Ok(Schema::Float),
            "double" => Ok(Schema::Double),
            "bytes" => self.with_logical(object, Schema::Bytes),
            "string" => self.with_logical(object, Schema::String),
            "record" => self.parse_record(object, enclosing, false),
            "error" => self.parse_record(object, enclosing, true),
            "enum" => self.parse_enum(object, enclosing),
            "array" => self.parse_array(object, enclosing),
            "map" => self.parse_map(object, enclosing),
            "fixed" => self.parse_fixed(object, enclosing),
            name => self.resolve_reference(name, enclosing),
        }
    }

    fn parse_record(
        &mut self,
        object: &Map<String, JsonValue>,
        enclosing: Option<&str>,
        is_error: bool,
    ) -> Result<Schema, SchemaError> {
        let (name, doc, aliases) = self.named_parts(object, "record", enclosing)?;
        if let Some(existing) = self.check_existing(object, &name, enclosing)? {
            return Ok(existing);
        }

        let fields_value = object
            .get("fields")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| {
                SchemaError::InvalidSchema(format!(
                    "record '{}' missing 'fields' array",
                    name.fullname()
                ))
            })?;

        // Make the name visible while its fields parse, so a field can
        // refer back to the record being defined.
        let cache = FingerprintCache::new();
        self.resolving
            .insert(name.fullname().to_string(), cache.clone());

        let mut fields = Vec::with_capacity(fields_value.len());
        for field_value in fields_value {
            fields.push(self.parse_field(field_value, name.namespace())?);
        }
        self.resolving.remove(name.fullname());

        let record = RecordSchema::from_parts(name, doc, aliases, fields, is_error, cache)?;
        let schema = Schema::Record(Arc::new(record));
        self.register(&schema)?;
        Ok(schema)
    }

    /// Parse a field within a record. Nested named types inherit the
    /// record's namespace.
    fn parse_field(
        &mut self,
        value: &JsonValue,
        enclosing: Option<&str>,
    ) -> Result<Field, SchemaError> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::InvalidSchema("field must be an object".to_string()))?;

        let name = object
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| SchemaError::InvalidSchema("field missing 'name'".to_string()))?;
        validate_name(name)?;

        let type_value = object
            .get("type")
            .ok_or_else(|| SchemaError::InvalidSchema(format!("field '{}' missing 'type'", name)))?;
        let schema = self.parse(type_value, enclosing)?;

        let default = match object.get("default") {
            Some(literal) => Some(resolve_default(literal, &schema, self.registry)?),
            None => None,
        };

        let doc = object
            .get("doc")
            .and_then(JsonValue::as_str)
            .map(String::from);

        let order = match object.get("order") {
            None => FieldOrder::Ascending,
            Some(JsonValue::String(order)) => match order.as_str() {
                "ascending" => FieldOrder::Ascending,
                "descending" => FieldOrder::Descending,
                "ignore" => FieldOrder::Ignore,
                other => {
                    return Err(SchemaError::InvalidSchema(format!(
                        "field '{}' has invalid order '{}'",
                        name, other
                    )));
                }
            },
            Some(other) => {
                return Err(SchemaError::InvalidSchema(format!(
                    "order of field '{}' must be a string, found {}",
                    name, other
                )));
            }
        };

        let mut aliases = Vec::new();
        if let Some(value) = object.get("aliases") {
            let entries = value.as_array().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("aliases of field '{}' must be an array", name))
            })?;
            for entry in entries {
                match entry.as_str() {
                    Some(alias) => {
                        validate_name(alias)?;
                        aliases.push(alias.to_string());
                    }
                    None => {
                        return Err(SchemaError::InvalidSchema(format!(
                            "alias of field '{}' must be a string",
                            name
                        )));
                    }
                }
            }
        }

        Ok(Field::from_parts(
            name.to_string(),
            doc,
            aliases,
            schema,
            default,
            order,
        ))
    }

    fn parse_enum(
        &mut self,
        object: &Map<String, JsonValue>,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let (name, doc, aliases) = self.named_parts(object, "enum", enclosing)?;
        if let Some(existing) = self.check_existing(object, &name, enclosing)? {
            return Ok(existing);
        }

        let symbols_value = object
            .get("symbols")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| {
                SchemaError::InvalidSchema(format!(
                    "enum '{}' missing 'symbols' array",
                    name.fullname()
                ))
            })?;
        let mut symbols = Vec::with_capacity(symbols_value.len());
        for symbol in symbols_value {
            match symbol.as_str() {
                Some(symbol) => symbols.push(symbol.to_string()),
                None => {
                    return Err(SchemaError::InvalidSchema(format!(
                        "symbol of enum '{}' must be a string",
                        name.fullname()
                    )));
                }
            }
        }

        let default = match object.get("default") {
            None => None,
            Some(JsonValue::String(symbol)) => Some(symbol.clone()),
            Some(other) => {
                return Err(SchemaError::InvalidDefault(format!(
                    "default of enum '{}' must be a string, found {}",
                    name.fullname(),
                    other
                )));
            }
        };

        let schema = Schema::Enum(Arc::new(EnumSchema::from_parts(
            name,
            doc,
            aliases,
            symbols,
            default,
            FingerprintCache::new(),
        )?));
        self.register(&schema)?;
        Ok(schema)
    }

    fn parse_array(
        &mut self,
        object: &Map<String, JsonValue>,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let items = object
            .get("items")
            .ok_or_else(|| SchemaError::InvalidSchema("array missing 'items'".to_string()))?;
        let items = self.parse(items, enclosing)?;
        Ok(Schema::Array(Arc::new(ArraySchema::new(items))))
    }

    fn parse_map(
        &mut self,
        object: &Map<String, JsonValue>,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let values = object
            .get("values")
            .ok_or_else(|| SchemaError::InvalidSchema("map missing 'values'".to_string()))?;
        let values = self.parse(values, enclosing)?;
        Ok(Schema::Map(Arc::new(MapSchema::new(values))))
    }

    fn parse_fixed(
        &mut self,
        object: &Map<String, JsonValue>,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let (name, doc, aliases) = self.named_parts(object, "fixed", enclosing)?;
        if let Some(existing) = self.check_existing(object, &name, enclosing)? {
            return Ok(existing);
        }

        let size = fixed_size(object, name.fullname())?;
        let logical = fixed_logical(object, size);

        let schema = Schema::Fixed(Arc::new(FixedSchema::from_parts(
            name,
            doc,
            aliases,
            size,
            logical,
            FingerprintCache::new(),
        )?));
        self.register(&schema)?;
        Ok(schema)
    }

    fn parse_union(
        &mut self,
        members: &[JsonValue],
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let mut parsed = Vec::with_capacity(members.len());
        for member in members {
            parsed.push(self.parse(member, enclosing)?);
        }
        let union = UnionSchema::new(parsed)?;
        Ok(Schema::Union(Arc::new(union)))
    }

    /// Shared name handling for records, enums, and fixed types. Returns
    /// the qualified name, doc, and qualified aliases.
    fn named_parts(
        &self,
        object: &Map<String, JsonValue>,
        kind: &str,
        enclosing: Option<&str>,
    ) -> Result<(Name, Option<String>, Vec<String>), SchemaError> {
        let name = object
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| SchemaError::InvalidSchema(format!("{} missing 'name'", kind)))?;
        let namespace = match object.get("namespace") {
            None => None,
            Some(JsonValue::String(namespace)) => Some(namespace.as_str()),
            Some(other) => {
                return Err(SchemaError::InvalidSchema(format!(
                    "'namespace' must be a string, found {}",
                    other
                )));
            }
        };
        let name = Name::new(name, namespace, enclosing)?;

        let doc = object
            .get("doc")
            .and_then(JsonValue::as_str)
            .map(String::from);

        let mut aliases = Vec::new();
        if let Some(value) = object.get("aliases") {
            let entries = value.as_array().ok_or_else(|| {
                SchemaError::InvalidSchema(format!(
                    "aliases of '{}' must be an array",
                    name.fullname()
                ))
            })?;
            for entry in entries {
                match entry.as_str() {
                    Some(alias) => aliases.push(name.qualify_alias(alias)?),
                    None => {
                        return Err(SchemaError::InvalidSchema(format!(
                            "alias of '{}' must be a string",
                            name.fullname()
                        )));
                    }
                }
            }
        }

        Ok((name, doc, aliases))
    }

    /// Handle a name that is already defined. Inside its own definition
    /// that is always an error; against a completed definition the new
    /// occurrence is accepted only if it parses to the identical schema,
    /// in which case it collapses to a reference.
    fn check_existing(
        &mut self,
        object: &Map<String, JsonValue>,
        name: &Name,
        enclosing: Option<&str>,
    ) -> Result<Option<Schema>, SchemaError> {
        if self.resolving.contains_key(name.fullname()) {
            return Err(SchemaError::DuplicateName(format!(
                "'{}' redefined inside its own definition",
                name.fullname()
            )));
        }
        if !self.registry.contains(name.fullname()) {
            return Ok(None);
        }
        let value = JsonValue::Object(object.clone());
        self.parse_redefinition(&value, name.fullname(), enclosing)
            .map(Some)
    }

    // The candidate parses against a fork of the registry so a mismatch
    // leaves no trace in the real one.
    fn parse_redefinition(
        &mut self,
        value: &JsonValue,
        fullname: &str,
        enclosing: Option<&str>,
    ) -> Result<Schema, SchemaError> {
        let existing = match self.registry.get(fullname) {
            Some(existing) => existing.clone(),
            None => return Err(SchemaError::UnknownType(fullname.to_string())),
        };

        let mut fork = self.registry.clone();
        fork.remove(fullname);
        let mut parser = SchemaParser {
            registry: &mut fork,
            resolving: self.resolving.clone(),
        };
        let candidate = parser.parse(value, enclosing)?;

        // Expanded forms, so a candidate that collapsed a nested type to a
        // reference still compares equal to the inline original.
        let candidate_form = canonical::expanded_canonical(&candidate, &fork);
        let existing_form = canonical::expanded_canonical(&existing, self.registry);
        if candidate_form == existing_form {
            debug!(name = fullname, "collapsed identical redefinition to reference");
            let reference = RefSchema::new(&existing)?;
            return Ok(Schema::Ref(Arc::new(reference)));
        }
        Err(SchemaError::DuplicateName(format!(
            "'{}' already defined with a different schema",
            fullname
        )))
    }

    // int, long, bytes, and string accept logicalType. Unknown or
    // malformed annotations degrade to the bare base type.
    fn with_logical(
        &self,
        object: &Map<String, JsonValue>,
        base: Schema,
    ) -> Result<Schema, SchemaError> {
        let name = match object.get("logicalType").and_then(JsonValue::as_str) {
            Some(name) => name,
            None => return Ok(base),
        };
        let logical = match (&base, name) {
            (Schema::Int, "date") => Some(LogicalType::Date),
            (Schema::Int, "time-millis") => Some(LogicalType::TimeMillis),
            (Schema::Long, "time-micros") => Some(LogicalType::TimeMicros),
            (Schema::Long, "timestamp-millis") => Some(LogicalType::TimestampMillis),
            (Schema::Long, "timestamp-micros") => Some(LogicalType::TimestampMicros),
            (Schema::Long, "local-timestamp-millis") => Some(LogicalType::LocalTimestampMillis),
            (Schema::Long, "local-timestamp-micros") => Some(LogicalType::LocalTimestampMicros),
            (Schema::Bytes, "decimal") => decimal_params(object),
            (Schema::String, "uuid") => Some(LogicalType::Uuid),
            _ => {
                warn!(
                    logical_type = name,
                    base = %base.schema_type(),
                    "ignoring unsupported logical type annotation"
                );
                None
            }
        };
        match logical {
            Some(logical) => Ok(Schema::Logical(Arc::new(LogicalSchema::from_parts(
                base, logical,
            )))),
            None => Ok(base),
        }
    }

    fn register(&mut self, schema: &Schema) -> Result<(), SchemaError> {
        let fullname = match schema.fullname() {
            Some(fullname) => fullname.to_string(),
            None => return Ok(()),
        };
        for alias in schema.aliases() {
            if *alias == fullname {
                continue;
            }
            // An alias key may not shadow a different registered name.
            if let Some(existing) = self.registry.get(alias) {
                if existing != schema {
                    return Err(SchemaError::DuplicateName(format!(
                        "alias '{}' of '{}' is already defined",
                        alias, fullname
                    )));
                }
                continue;
            }
            self.registry.insert(alias.clone(), schema.clone());
        }
        debug!(name = %fullname, "registered named schema");
        self.registry.insert(fullname, schema.clone());
        Ok(())
    }

    // Digest every registered named schema so references created during
    // this parse observe completed cells from here on.
    fn warm_fingerprints(&self) {
        for schema in self.registry.schemas() {
            schema.fingerprint();
            schema.rabin_fingerprint();
        }
    }
}

fn primitive_from_name(name: &str) -> Option<Schema> {
    match name {
        "null" => Some(Schema::Null),
        "boolean" => Some(Schema::Boolean),
        "int" => Some(Schema::Int),
        "long" => Some(Schema::Long),
        "float" => Some(Schema::Float),
        "double" => Some(Schema::Double),
        "bytes" => Some(Schema::Bytes),
        "string" => Some(Schema::String),
        _ => None,
    }
}

fn fixed_size(object: &Map<String, JsonValue>, fullname: &str) -> Result<usize, SchemaError> {
    let number = match object.get("size") {
        Some(JsonValue::Number(number)) => number,
        Some(other) => {
            return Err(SchemaError::InvalidSchema(format!(
                "size of fixed '{}' must be a number, found {}",
                fullname, other
            )));
        }
        None => {
            return Err(SchemaError::InvalidSchema(format!(
                "fixed '{}' missing 'size'",
                fullname
            )));
        }
    };
    let size = match number.as_u64() {
        Some(size) => size,
        // Accept integer-valued floats such as 16.0. The cast saturates at
        // 2^64, so the bound check comes first.
        None => match number.as_f64() {
            Some(size)
                if size.fract() == 0.0
                    && size > 0.0
                    && size < 18_446_744_073_709_551_616.0 =>
            {
                size as u64
            }
            _ => {
                return Err(SchemaError::InvalidSchema(format!(
                    "size of fixed '{}' must be a positive integer",
                    fullname
                )));
            }
        },
    };
    usize::try_from(size).map_err(|_| {
        SchemaError::InvalidSchema(format!("size of fixed '{}' is too large", fullname))
    })
}

// Fixed accepts decimal and duration annotations. Anything else is
// ignored with a warning.
fn fixed_logical(object: &Map<String, JsonValue>, size: usize) -> Option<LogicalType> {
    let name = object.get("logicalType").and_then(JsonValue::as_str)?;
    match name {
        "decimal" => decimal_params(object),
        "duration" if size == 12 => Some(LogicalType::Duration),
        "duration" => {
            warn!(
                size = size,
                "ignoring duration annotation on fixed with size other than 12"
            );
            None
        }
        other => {
            warn!(
                logical_type = other,
                "ignoring unsupported logical type annotation on fixed"
            );
            None
        }
    }
}

fn decimal_params(object: &Map<String, JsonValue>) -> Option<LogicalType> {
    let precision = object.get("precision").and_then(JsonValue::as_u64);
    let scale = object.get("scale").and_then(JsonValue::as_u64).unwrap_or(0);
    match precision {
        Some(precision) if precision >= 1 && precision <= u32::MAX as u64 && scale <= precision => {
            Some(LogicalType::Decimal {
                precision: precision as u32,
                scale: scale as u32,
            })
        }
        _ => {
            warn!("ignoring decimal annotation with invalid precision or scale");
            None
        }
    }
}
