//! Tests for Avro schema types and parsing.

use fuselage::schema::*;
use fuselage::SchemaError;

// ============================================================================
// Schema Type Tests
// ============================================================================

#[test]
fn test_primitive_types() {
    assert!(Schema::Null.is_primitive());
    assert!(Schema::Boolean.is_primitive());
    assert!(Schema::Int.is_primitive());
    assert!(Schema::Long.is_primitive());
    assert!(Schema::Float.is_primitive());
    assert!(Schema::Double.is_primitive());
    assert!(Schema::Bytes.is_primitive());
    assert!(Schema::String.is_primitive());
}

#[test]
fn test_schema_type_tags() {
    assert_eq!(Schema::Null.schema_type(), SchemaType::Null);
    assert_eq!(Schema::Long.schema_type().as_str(), "long");
    assert_eq!(SchemaType::Fixed.to_string(), "fixed");

    let schema = parse(r#"{"type": "map", "values": "int"}"#).unwrap();
    assert_eq!(schema.schema_type(), SchemaType::Map);
    assert!(!schema.is_primitive());
    assert!(!schema.is_named());
}

// ============================================================================
// Parser Tests - Primitive Types
// ============================================================================

#[test]
fn test_parse_primitive_string_schemas() {
    assert_eq!(parse(r#""null""#).unwrap(), Schema::Null);
    assert_eq!(parse(r#""boolean""#).unwrap(), Schema::Boolean);
    assert_eq!(parse(r#""int""#).unwrap(), Schema::Int);
    assert_eq!(parse(r#""long""#).unwrap(), Schema::Long);
    assert_eq!(parse(r#""float""#).unwrap(), Schema::Float);
    assert_eq!(parse(r#""double""#).unwrap(), Schema::Double);
    assert_eq!(parse(r#""bytes""#).unwrap(), Schema::Bytes);
    assert_eq!(parse(r#""string""#).unwrap(), Schema::String);
}

#[test]
fn test_parse_primitive_object_schemas() {
    assert_eq!(parse(r#"{"type": "null"}"#).unwrap(), Schema::Null);
    assert_eq!(parse(r#"{"type": "int"}"#).unwrap(), Schema::Int);
    assert_eq!(parse(r#"{"type": "string"}"#).unwrap(), Schema::String);
}

#[test]
fn test_parse_json_null_literal() {
    // A bare JSON null means the null type.
    assert_eq!(parse("null").unwrap(), Schema::Null);
}

#[test]
fn test_parse_bare_type_name() {
    // Unquoted input that is a valid name parses as if it were quoted.
    assert_eq!(parse("string").unwrap(), Schema::String);
    assert_eq!(parse("  long  ").unwrap(), Schema::Long);
}

#[test]
fn test_parse_invalid_inputs() {
    assert!(matches!(
        parse("123"),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(parse("true"), Err(SchemaError::InvalidSchema(_))));
    assert!(matches!(
        parse(r#"{"type": 123}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"name": "NoType"}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(parse("{"), Err(SchemaError::InvalidJson(_))));
    assert!(matches!(parse(""), Err(SchemaError::InvalidJson(_))));
}

#[test]
fn test_parse_unknown_type_name() {
    assert!(matches!(
        parse(r#""nonexistent""#),
        Err(SchemaError::UnknownType(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "wat", "name": "X"}"#),
        Err(SchemaError::UnknownType(_))
    ));
}

// ============================================================================
// Parser Tests - Record Schema
// ============================================================================

#[test]
fn test_parse_simple_record() {
    let json = r#"{
        "type": "record",
        "name": "User",
        "fields": [
            {"name": "id", "type": "long"},
            {"name": "name", "type": "string"}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match &schema {
        Schema::Record(r) => {
            assert_eq!(r.name(), "User");
            assert_eq!(r.namespace(), None);
            assert_eq!(r.fields().len(), 2);
            assert_eq!(r.fields()[0].name(), "id");
            assert_eq!(r.fields()[0].schema(), &Schema::Long);
            assert_eq!(r.fields()[1].name(), "name");
            assert_eq!(r.fields()[1].schema(), &Schema::String);
            assert!(!r.is_error());
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
    assert!(schema.is_named());
    assert_eq!(schema.fullname(), Some("User"));
}

#[test]
fn test_parse_record_with_namespace_and_doc() {
    let json = r#"{
        "type": "record",
        "name": "User",
        "namespace": "com.example",
        "doc": "A user record",
        "fields": [
            {"name": "id", "type": "long", "doc": "Primary key"}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match schema {
        Schema::Record(r) => {
            assert_eq!(r.name(), "User");
            assert_eq!(r.namespace(), Some("com.example"));
            assert_eq!(r.fullname(), "com.example.User");
            assert_eq!(r.doc(), Some("A user record"));
            assert_eq!(r.fields()[0].doc(), Some("Primary key"));
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_parse_error_record() {
    let json = r#"{
        "type": "error",
        "name": "Err",
        "namespace": "org.apache.avro",
        "fields": [
            {"name": "message", "type": "string"}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match schema {
        Schema::Record(r) => {
            assert!(r.is_error());
            assert_eq!(r.fullname(), "org.apache.avro.Err");
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_parse_dotted_name_overrides_namespace() {
    let json = r#"{
        "type": "record",
        "name": "x.y.Rec",
        "namespace": "ignored",
        "fields": [{"name": "f", "type": "int"}]
    }"#;

    let schema = parse(json).unwrap();
    assert_eq!(schema.fullname(), Some("x.y.Rec"));
    assert_eq!(schema.namespace(), Some("x.y"));
    assert_eq!(schema.name(), Some("Rec"));
}

#[test]
fn test_parse_nested_record_inherits_namespace() {
    let json = r#"{
        "type": "record",
        "name": "Outer",
        "namespace": "com.example",
        "fields": [
            {
                "name": "inner",
                "type": {
                    "type": "record",
                    "name": "Inner",
                    "fields": [{"name": "value", "type": "int"}]
                }
            }
        ]
    }"#;

    let schema = parse(json).unwrap();
    match &schema {
        Schema::Record(outer) => match outer.fields()[0].schema() {
            Schema::Record(inner) => {
                assert_eq!(inner.fullname(), "com.example.Inner");
            }
            other => panic!("Expected nested Record, got {:?}", other),
        },
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_parse_nested_declared_namespace_wins() {
    let json = r#"{
        "type": "record",
        "name": "Outer",
        "namespace": "com.example",
        "fields": [
            {
                "name": "inner",
                "type": {
                    "type": "enum",
                    "name": "Status",
                    "namespace": "org.other",
                    "symbols": ["ON", "OFF"]
                }
            }
        ]
    }"#;

    let schema = parse(json).unwrap();
    match &schema {
        Schema::Record(outer) => {
            assert_eq!(outer.fields()[0].schema().fullname(), Some("org.other.Status"));
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_parse_record_field_defaults() {
    let json = r#"{
        "type": "record",
        "name": "Defaults",
        "fields": [
            {"name": "count", "type": "long", "default": 1.0},
            {"name": "label", "type": "string", "default": "none"},
            {"name": "raw", "type": "bytes", "default": "ÿ\u0000"},
            {"name": "maybe", "type": ["null", "int"], "default": null}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match schema {
        Schema::Record(r) => {
            assert_eq!(r.field("count").unwrap().default(), Some(&Value::Long(1)));
            assert_eq!(
                r.field("label").unwrap().default(),
                Some(&Value::String("none".to_string()))
            );
            assert_eq!(
                r.field("raw").unwrap().default(),
                Some(&Value::Bytes(vec![0xff, 0x00]))
            );
            assert_eq!(r.field("maybe").unwrap().default(), Some(&Value::Null));
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_parse_record_invalid_defaults_fail() {
    let int_string = r#"{
        "type": "record",
        "name": "Bad",
        "fields": [{"name": "f", "type": "int", "default": "nope"}]
    }"#;
    assert!(matches!(
        parse(int_string),
        Err(SchemaError::InvalidDefault(_))
    ));

    let int_overflow = r#"{
        "type": "record",
        "name": "Bad",
        "fields": [{"name": "f", "type": "int", "default": 2147483648}]
    }"#;
    assert!(matches!(
        parse(int_overflow),
        Err(SchemaError::InvalidDefault(_))
    ));

    // Long defaults beyond i64 range fail instead of rounding to i64::MAX.
    let long_overflow = r#"{
        "type": "record",
        "name": "Bad",
        "fields": [{"name": "f", "type": "long", "default": 10000000000000000000}]
    }"#;
    assert!(matches!(
        parse(long_overflow),
        Err(SchemaError::InvalidDefault(_))
    ));

    let long_float_overflow = r#"{
        "type": "record",
        "name": "Bad",
        "fields": [{"name": "f", "type": "long", "default": 1e30}]
    }"#;
    assert!(matches!(
        parse(long_float_overflow),
        Err(SchemaError::InvalidDefault(_))
    ));

    // Union defaults conform to the first member only.
    let union_second = r#"{
        "type": "record",
        "name": "Bad",
        "fields": [{"name": "f", "type": ["null", "string"], "default": "text"}]
    }"#;
    assert!(matches!(
        parse(union_second),
        Err(SchemaError::InvalidDefault(_))
    ));
}

#[test]
fn test_parse_record_requires_fields() {
    assert!(matches!(
        parse(r#"{"type": "record", "name": "NoFields"}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "record", "name": "Empty", "fields": []}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "record", "fields": []}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
}

#[test]
fn test_parse_field_requires_name_and_type() {
    assert!(matches!(
        parse(r#"{"type": "record", "name": "R", "fields": [{"type": "int"}]}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "record", "name": "R", "fields": [{"name": "f"}]}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
}

#[test]
fn test_parse_duplicate_field_names() {
    let json = r#"{
        "type": "record",
        "name": "Dup",
        "fields": [
            {"name": "f", "type": "int"},
            {"name": "f", "type": "string"}
        ]
    }"#;
    assert!(matches!(parse(json), Err(SchemaError::DuplicateName(_))));
}

#[test]
fn test_parse_field_order() {
    let json = r#"{
        "type": "record",
        "name": "Ordered",
        "fields": [
            {"name": "a", "type": "int", "order": "descending"},
            {"name": "b", "type": "int", "order": "ignore"},
            {"name": "c", "type": "int", "order": "ascending"},
            {"name": "d", "type": "int"}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match schema {
        Schema::Record(r) => {
            assert_eq!(r.fields()[0].order(), FieldOrder::Descending);
            assert_eq!(r.fields()[1].order(), FieldOrder::Ignore);
            assert_eq!(r.fields()[2].order(), FieldOrder::Ascending);
            assert_eq!(r.fields()[3].order(), FieldOrder::Ascending);
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }

    let bad = r#"{
        "type": "record",
        "name": "Bad",
        "fields": [{"name": "a", "type": "int", "order": "sideways"}]
    }"#;
    assert!(matches!(parse(bad), Err(SchemaError::InvalidSchema(_))));
}

#[test]
fn test_parse_field_aliases() {
    let json = r#"{
        "type": "record",
        "name": "Renamed",
        "fields": [
            {"name": "id", "type": "long", "aliases": ["identifier", "key"]}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match schema {
        Schema::Record(r) => {
            assert_eq!(r.fields()[0].aliases(), &["identifier", "key"]);
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

// ============================================================================
// Parser Tests - Self-Referential Records
// ============================================================================

#[test]
fn test_parse_recursive_record() {
    let json = r#"{
        "type": "record",
        "name": "LongList",
        "fields": [
            {"name": "value", "type": "long"},
            {"name": "next", "type": ["null", "LongList"]}
        ]
    }"#;

    let schema = parse(json).unwrap();
    let record = match &schema {
        Schema::Record(r) => r,
        other => panic!("Expected Record schema, got {:?}", other),
    };

    let next = match record.fields()[1].schema() {
        Schema::Union(u) => u,
        other => panic!("Expected Union, got {:?}", other),
    };
    let tail = match &next.members()[1] {
        Schema::Ref(r) => r,
        other => panic!("Expected Ref, got {:?}", other),
    };
    assert_eq!(tail.fullname(), "LongList");

    // The reference serves the record's own fingerprints.
    assert_eq!(tail.fingerprint(), schema.fingerprint());
    assert_eq!(tail.rabin_fingerprint(), schema.rabin_fingerprint());

    assert_eq!(
        schema.canonical_form(),
        r#"{"name":"LongList","type":"record","fields":[{"name":"value","type":"long"},{"name":"next","type":["null","LongList"]}]}"#
    );
}

#[test]
fn test_parse_mutually_nested_records() {
    let json = r#"{
        "type": "record",
        "name": "Tree",
        "namespace": "graph",
        "fields": [
            {
                "name": "children",
                "type": {"type": "array", "items": "Tree"}
            },
            {"name": "label", "type": "string"}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match &schema {
        Schema::Record(r) => match r.fields()[0].schema() {
            Schema::Array(items) => {
                assert_eq!(items.items().fullname(), Some("graph.Tree"));
            }
            other => panic!("Expected Array, got {:?}", other),
        },
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_redefining_name_inside_own_definition_fails() {
    let json = r#"{
        "type": "record",
        "name": "Loop",
        "fields": [
            {
                "name": "again",
                "type": {
                    "type": "record",
                    "name": "Loop",
                    "fields": [{"name": "x", "type": "int"}]
                }
            }
        ]
    }"#;
    assert!(matches!(parse(json), Err(SchemaError::DuplicateName(_))));
}

// ============================================================================
// Parser Tests - Enum Schema
// ============================================================================

#[test]
fn test_parse_enum() {
    let json = r#"{
        "type": "enum",
        "name": "Suit",
        "namespace": "cards",
        "symbols": ["SPADES", "HEARTS", "DIAMONDS", "CLUBS"]
    }"#;

    let schema = parse(json).unwrap();
    match &schema {
        Schema::Enum(e) => {
            assert_eq!(e.fullname(), "cards.Suit");
            assert_eq!(e.symbols().len(), 4);
            assert_eq!(e.symbol_index("DIAMONDS"), Some(2));
            assert_eq!(e.default(), None);
        }
        other => panic!("Expected Enum schema, got {:?}", other),
    }
    assert!(schema.is_named());
}

#[test]
fn test_parse_enum_default() {
    let json = r#"{
        "type": "enum",
        "name": "Status",
        "symbols": ["OK", "FAILED"],
        "default": "OK"
    }"#;
    match parse(json).unwrap() {
        Schema::Enum(e) => assert_eq!(e.default(), Some("OK")),
        other => panic!("Expected Enum schema, got {:?}", other),
    }

    let bad = r#"{
        "type": "enum",
        "name": "Status",
        "symbols": ["OK", "FAILED"],
        "default": "UNKNOWN"
    }"#;
    assert!(matches!(parse(bad), Err(SchemaError::InvalidDefault(_))));
}

#[test]
fn test_parse_enum_invalid_symbols() {
    let duplicate = r#"{"type": "enum", "name": "E", "symbols": ["A", "A"]}"#;
    assert!(matches!(
        parse(duplicate),
        Err(SchemaError::DuplicateName(_))
    ));

    let invalid = r#"{"type": "enum", "name": "E", "symbols": ["not-a-name"]}"#;
    assert!(matches!(parse(invalid), Err(SchemaError::InvalidName(_))));

    let empty = r#"{"type": "enum", "name": "E", "symbols": []}"#;
    assert!(matches!(parse(empty), Err(SchemaError::InvalidSchema(_))));

    let missing = r#"{"type": "enum", "name": "E"}"#;
    assert!(matches!(parse(missing), Err(SchemaError::InvalidSchema(_))));
}

// ============================================================================
// Parser Tests - Fixed Schema
// ============================================================================

#[test]
fn test_parse_fixed() {
    let json = r#"{"type": "fixed", "name": "md5", "namespace": "org.example", "size": 16}"#;
    match parse(json).unwrap() {
        Schema::Fixed(f) => {
            assert_eq!(f.fullname(), "org.example.md5");
            assert_eq!(f.size(), 16);
            assert_eq!(f.logical(), None);
        }
        other => panic!("Expected Fixed schema, got {:?}", other),
    }
}

#[test]
fn test_parse_fixed_invalid_size() {
    assert!(matches!(
        parse(r#"{"type": "fixed", "name": "f", "size": "test"}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "fixed", "name": "f", "size": 0}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "fixed", "name": "f", "size": -4}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    // A float size too large for u64 fails instead of saturating.
    assert!(matches!(
        parse(r#"{"type": "fixed", "name": "f", "size": 1e30}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "fixed", "name": "f"}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
}

#[test]
fn test_parse_fixed_integral_float_size() {
    match parse(r#"{"type": "fixed", "name": "f", "size": 16.0}"#).unwrap() {
        Schema::Fixed(f) => assert_eq!(f.size(), 16),
        other => panic!("Expected Fixed schema, got {:?}", other),
    }
}

#[test]
fn test_parse_fixed_decimal() {
    let json = r#"{
        "type": "fixed",
        "name": "money",
        "size": 8,
        "logicalType": "decimal",
        "precision": 10,
        "scale": 2
    }"#;
    match parse(json).unwrap() {
        Schema::Fixed(f) => {
            assert_eq!(
                f.logical(),
                Some(&LogicalType::Decimal {
                    precision: 10,
                    scale: 2
                })
            );
        }
        other => panic!("Expected Fixed schema, got {:?}", other),
    }

    // Invalid parameters drop the annotation, not the schema.
    let bad = r#"{
        "type": "fixed",
        "name": "money",
        "size": 8,
        "logicalType": "decimal",
        "precision": 0
    }"#;
    match parse(bad).unwrap() {
        Schema::Fixed(f) => assert_eq!(f.logical(), None),
        other => panic!("Expected Fixed schema, got {:?}", other),
    }
}

#[test]
fn test_parse_fixed_duration() {
    let json = r#"{"type": "fixed", "name": "dur", "size": 12, "logicalType": "duration"}"#;
    match parse(json).unwrap() {
        Schema::Fixed(f) => assert_eq!(f.logical(), Some(&LogicalType::Duration)),
        other => panic!("Expected Fixed schema, got {:?}", other),
    }

    let wrong_size = r#"{"type": "fixed", "name": "dur", "size": 11, "logicalType": "duration"}"#;
    match parse(wrong_size).unwrap() {
        Schema::Fixed(f) => assert_eq!(f.logical(), None),
        other => panic!("Expected Fixed schema, got {:?}", other),
    }
}

// ============================================================================
// Parser Tests - Arrays and Maps
// ============================================================================

#[test]
fn test_parse_array() {
    let schema = parse(r#"{"type": "array", "items": "string"}"#).unwrap();
    match &schema {
        Schema::Array(a) => assert_eq!(a.items(), &Schema::String),
        other => panic!("Expected Array schema, got {:?}", other),
    }

    assert!(matches!(
        parse(r#"{"type": "array"}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
}

#[test]
fn test_parse_map() {
    let schema = parse(r#"{"type": "map", "values": "long"}"#).unwrap();
    match &schema {
        Schema::Map(m) => assert_eq!(m.values(), &Schema::Long),
        other => panic!("Expected Map schema, got {:?}", other),
    }

    assert!(matches!(
        parse(r#"{"type": "map"}"#),
        Err(SchemaError::InvalidSchema(_))
    ));
}

#[test]
fn test_parse_nested_containers() {
    let json = r#"{
        "type": "array",
        "items": {"type": "map", "values": ["null", "double"]}
    }"#;
    let schema = parse(json).unwrap();
    match &schema {
        Schema::Array(a) => match a.items() {
            Schema::Map(m) => assert!(m.values().is_nullable()),
            other => panic!("Expected Map items, got {:?}", other),
        },
        other => panic!("Expected Array schema, got {:?}", other),
    }
}

// ============================================================================
// Parser Tests - Unions
// ============================================================================

#[test]
fn test_parse_union() {
    let schema = parse(r#"["null", "string", "int"]"#).unwrap();
    match &schema {
        Schema::Union(u) => {
            assert_eq!(u.members().len(), 3);
            assert_eq!(u.members()[0], Schema::Null);
            assert_eq!(u.members()[1], Schema::String);
            assert_eq!(u.members()[2], Schema::Int);
        }
        other => panic!("Expected Union schema, got {:?}", other),
    }
    assert_eq!(schema.schema_type(), SchemaType::Union);
}

#[test]
fn test_parse_union_type_attribute_form() {
    let schema = parse(r#"{"type": ["null", "string"]}"#).unwrap();
    assert!(schema.is_nullable());
    assert_eq!(schema.nullable_inner(), Some(&Schema::String));

    // Both spellings of a union carry the same identity.
    let wrapped = parse(r#"{"type": ["null", "int"]}"#).unwrap();
    let direct = parse(r#"["null", "int"]"#).unwrap();
    assert_eq!(wrapped.schema_type(), SchemaType::Union);
    assert_eq!(wrapped.fingerprint(), direct.fingerprint());
}

#[test]
fn test_parse_union_constraints() {
    assert!(matches!(parse("[]"), Err(SchemaError::InvalidUnion(_))));
    assert!(matches!(
        parse(r#"["int", "int"]"#),
        Err(SchemaError::InvalidUnion(_))
    ));
    assert!(matches!(
        parse(r#"["int", ["null", "string"]]"#),
        Err(SchemaError::InvalidUnion(_))
    ));
    // Two array members collide even with different item types.
    assert!(matches!(
        parse(
            r#"[{"type": "array", "items": "int"}, {"type": "array", "items": "string"}]"#
        ),
        Err(SchemaError::InvalidUnion(_))
    ));
}

#[test]
fn test_parse_union_distinct_named_types() {
    let ok = r#"[
        {"type": "fixed", "name": "a", "size": 4},
        {"type": "fixed", "name": "b", "size": 4}
    ]"#;
    assert!(parse(ok).is_ok());

    // A definition and a reference to it share a name.
    let collide = r#"[
        {"type": "enum", "name": "E", "symbols": ["A"]},
        "E"
    ]"#;
    assert!(matches!(parse(collide), Err(SchemaError::InvalidUnion(_))));
}

// ============================================================================
// Parser Tests - Logical Types
// ============================================================================

#[test]
fn test_parse_logical_types() {
    let cases = [
        (r#"{"type": "int", "logicalType": "date"}"#, SchemaType::Int, "date"),
        (
            r#"{"type": "int", "logicalType": "time-millis"}"#,
            SchemaType::Int,
            "time-millis",
        ),
        (
            r#"{"type": "long", "logicalType": "time-micros"}"#,
            SchemaType::Long,
            "time-micros",
        ),
        (
            r#"{"type": "long", "logicalType": "timestamp-millis"}"#,
            SchemaType::Long,
            "timestamp-millis",
        ),
        (
            r#"{"type": "long", "logicalType": "timestamp-micros"}"#,
            SchemaType::Long,
            "timestamp-micros",
        ),
        (
            r#"{"type": "long", "logicalType": "local-timestamp-millis"}"#,
            SchemaType::Long,
            "local-timestamp-millis",
        ),
        (
            r#"{"type": "string", "logicalType": "uuid"}"#,
            SchemaType::String,
            "uuid",
        ),
    ];

    for (json, base_tag, logical_name) in cases {
        let schema = parse(json).unwrap();
        match &schema {
            Schema::Logical(l) => {
                assert_eq!(l.logical_type().name(), logical_name);
                assert_eq!(l.base().schema_type(), base_tag);
            }
            other => panic!("Expected Logical schema for {}, got {:?}", json, other),
        }
        // The annotation is transparent to the type tag.
        assert_eq!(schema.schema_type(), base_tag);
    }
}

#[test]
fn test_parse_bytes_decimal() {
    let json = r#"{"type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 2}"#;
    match parse(json).unwrap() {
        Schema::Logical(l) => {
            assert_eq!(
                l.logical_type(),
                &LogicalType::Decimal {
                    precision: 4,
                    scale: 2
                }
            );
            assert_eq!(l.base(), &Schema::Bytes);
        }
        other => panic!("Expected Logical schema, got {:?}", other),
    }
}

#[test]
fn test_unknown_logical_type_ignored() {
    assert_eq!(
        parse(r#"{"type": "int", "logicalType": "custom-thing"}"#).unwrap(),
        Schema::Int
    );
    // Annotation on the wrong base degrades the same way.
    assert_eq!(
        parse(r#"{"type": "int", "logicalType": "timestamp-millis"}"#).unwrap(),
        Schema::Int
    );
}

#[test]
fn test_decimal_invalid_params_ignored() {
    assert_eq!(
        parse(r#"{"type": "bytes", "logicalType": "decimal", "precision": 0}"#).unwrap(),
        Schema::Bytes
    );
    assert_eq!(
        parse(r#"{"type": "bytes", "logicalType": "decimal", "precision": 2, "scale": 5}"#)
            .unwrap(),
        Schema::Bytes
    );
    assert_eq!(
        parse(r#"{"type": "bytes", "logicalType": "decimal"}"#).unwrap(),
        Schema::Bytes
    );
}

// ============================================================================
// Name Validation Tests
// ============================================================================

#[test]
fn test_invalid_names_rejected() {
    assert!(matches!(
        parse(r#"{"type": "record", "name": "test+", "fields": [{"name": "f", "type": "int"}]}"#),
        Err(SchemaError::InvalidName(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "record", "name": "2users", "fields": [{"name": "f", "type": "int"}]}"#),
        Err(SchemaError::InvalidName(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "record", "name": "", "fields": [{"name": "f", "type": "int"}]}"#),
        Err(SchemaError::InvalidName(_))
    ));
    assert!(matches!(
        parse(r#"{"type": "record", "name": "R", "fields": [{"name": "f-1", "type": "int"}]}"#),
        Err(SchemaError::InvalidName(_))
    ));
}

#[test]
fn test_invalid_namespaces_rejected() {
    assert!(matches!(
        parse(
            r#"{"type": "fixed", "name": "f", "namespace": "", "size": 2}"#
        ),
        Err(SchemaError::InvalidName(_))
    ));
    assert!(matches!(
        parse(
            r#"{"type": "fixed", "name": "f", "namespace": "org..broken", "size": 2}"#
        ),
        Err(SchemaError::InvalidName(_))
    ));
    assert!(matches!(
        parse(
            r#"{"type": "fixed", "name": "f", "namespace": "org.9bad", "size": 2}"#
        ),
        Err(SchemaError::InvalidName(_))
    ));
}

#[test]
fn test_underscored_names_accepted() {
    let json = r#"{
        "type": "record",
        "name": "_Rec",
        "namespace": "_ns._sub",
        "fields": [{"name": "_f", "type": "int"}]
    }"#;
    assert_eq!(parse(json).unwrap().fullname(), Some("_ns._sub._Rec"));
}

// ============================================================================
// Named References and Registry Tests
// ============================================================================

#[test]
fn test_reference_previously_defined_type() {
    let json = r#"{
        "type": "record",
        "name": "Pair",
        "fields": [
            {"name": "left", "type": {"type": "fixed", "name": "Hash", "size": 16}},
            {"name": "right", "type": "Hash"}
        ]
    }"#;

    let schema = parse(json).unwrap();
    let record = match &schema {
        Schema::Record(r) => r,
        other => panic!("Expected Record schema, got {:?}", other),
    };
    let right = match record.fields()[1].schema() {
        Schema::Ref(r) => r,
        other => panic!("Expected Ref, got {:?}", other),
    };
    assert_eq!(right.fullname(), "Hash");
    assert_eq!(
        right.fingerprint(),
        record.fields()[0].schema().fingerprint()
    );

    // The definition is inlined once; the reference stays a name.
    assert_eq!(
        schema.canonical_form(),
        r#"{"name":"Pair","type":"record","fields":[{"name":"left","type":{"name":"Hash","type":"fixed","size":16}},{"name":"right","type":"Hash"}]}"#
    );
}

#[test]
fn test_parse_with_registry_across_texts() {
    let mut registry = SchemaRegistry::new();

    parse_with_registry(
        r#"{"type": "enum", "name": "Suit", "namespace": "cards", "symbols": ["SPADES"]}"#,
        &mut registry,
    )
    .unwrap();
    assert!(registry.contains("cards.Suit"));

    let schema = parse_with_registry(r#""cards.Suit""#, &mut registry).unwrap();
    assert_eq!(schema.schema_type(), SchemaType::Ref);
    assert_eq!(schema.fullname(), Some("cards.Suit"));

    let wrapped = parse_with_registry(
        r#"{"type": "array", "items": "cards.Suit"}"#,
        &mut registry,
    )
    .unwrap();
    match wrapped {
        Schema::Array(a) => assert_eq!(a.items().fullname(), Some("cards.Suit")),
        other => panic!("Expected Array schema, got {:?}", other),
    }
}

#[test]
fn test_unknown_reference_fails() {
    assert!(matches!(
        parse(r#""com.example.Missing""#),
        Err(SchemaError::UnknownType(_))
    ));

    let mut registry = SchemaRegistry::new();
    let result = parse_with_registry(r#""com.example.Missing""#, &mut registry);
    assert!(matches!(result, Err(SchemaError::UnknownType(_))));
}

#[test]
fn test_alias_registration() {
    let mut registry = SchemaRegistry::new();
    parse_with_registry(
        r#"{
            "type": "record",
            "name": "Employee",
            "namespace": "hr",
            "aliases": ["Worker", "org.legacy.Person"],
            "fields": [{"name": "id", "type": "long"}]
        }"#,
        &mut registry,
    )
    .unwrap();

    // Bare aliases inherit the schema's namespace; dotted aliases stand
    // as written.
    assert!(registry.contains("hr.Employee"));
    assert!(registry.contains("hr.Worker"));
    assert!(registry.contains("org.legacy.Person"));

    // Referencing through an alias yields the true name.
    let schema = parse_with_registry(r#""hr.Worker""#, &mut registry).unwrap();
    assert_eq!(schema.fullname(), Some("hr.Employee"));
    assert_eq!(schema.canonical_form(), r#""hr.Employee""#);
}

#[test]
fn test_alias_colliding_with_defined_name_fails() {
    // The enum's alias lands on the registered name of the fixed type.
    let json = r#"{
        "type": "record",
        "name": "Holder",
        "fields": [
            {"name": "a", "type": {"type": "fixed", "name": "Id", "size": 8}},
            {"name": "b", "type": {"type": "enum", "name": "Kind", "aliases": ["Id"], "symbols": ["X"]}}
        ]
    }"#;
    assert!(matches!(parse(json), Err(SchemaError::DuplicateName(_))));

    // An alias of an unrelated name registers fine.
    let ok = r#"{
        "type": "record",
        "name": "Holder",
        "fields": [
            {"name": "a", "type": {"type": "fixed", "name": "Id", "size": 8}},
            {"name": "b", "type": {"type": "enum", "name": "Kind", "aliases": ["Sort"], "symbols": ["X"]}}
        ]
    }"#;
    assert!(parse(ok).is_ok());
}

#[test]
fn test_identical_redefinition_collapses_to_reference() {
    let json = r#"{
        "type": "record",
        "name": "Wrapper",
        "fields": [
            {"name": "a", "type": {"type": "enum", "name": "E", "symbols": ["X", "Y"]}},
            {"name": "b", "type": {"type": "enum", "name": "E", "symbols": ["X", "Y"]}}
        ]
    }"#;

    let schema = parse(json).unwrap();
    match &schema {
        Schema::Record(r) => {
            assert_eq!(r.fields()[0].schema().schema_type(), SchemaType::Enum);
            assert_eq!(r.fields()[1].schema().schema_type(), SchemaType::Ref);
            assert_eq!(
                r.fields()[0].schema().fingerprint(),
                r.fields()[1].schema().fingerprint()
            );
        }
        other => panic!("Expected Record schema, got {:?}", other),
    }
}

#[test]
fn test_reparsing_same_text_with_registry_collapses() {
    let json = r#"{
        "type": "record",
        "name": "Wrapper",
        "fields": [
            {"name": "status", "type": {"type": "enum", "name": "Status", "symbols": ["ON", "OFF"]}}
        ]
    }"#;

    let mut registry = SchemaRegistry::new();
    let first = parse_with_registry(json, &mut registry).unwrap();

    // The whole text again: the nested enum resolves against the registry
    // this time, and the record still collapses to a reference.
    let second = parse_with_registry(json, &mut registry).unwrap();
    assert_eq!(second.schema_type(), SchemaType::Ref);
    assert_eq!(second.fullname(), Some("Wrapper"));
    assert_eq!(second.fingerprint(), first.fingerprint());
}

#[test]
fn test_conflicting_redefinition_fails() {
    let json = r#"{
        "type": "record",
        "name": "Wrapper",
        "fields": [
            {"name": "a", "type": {"type": "enum", "name": "E", "symbols": ["X", "Y"]}},
            {"name": "b", "type": {"type": "enum", "name": "E", "symbols": ["X", "Z"]}}
        ]
    }"#;
    assert!(matches!(parse(json), Err(SchemaError::DuplicateName(_))));
}

#[test]
fn test_registry_unchanged_on_error() {
    let mut registry = SchemaRegistry::new();

    // The inner record parses before the bad member is reached.
    let result = parse_with_registry(
        r#"[
            {"type": "record", "name": "Good", "fields": [{"name": "f", "type": "int"}]},
            123
        ]"#,
        &mut registry,
    );
    assert!(result.is_err());
    assert!(registry.is_empty());
}

// ============================================================================
// must_parse Tests
// ============================================================================

#[test]
fn test_must_parse_valid_literal() {
    let schema = must_parse(r#"{"type": "array", "items": "long"}"#);
    assert_eq!(schema.schema_type(), SchemaType::Array);
}

#[test]
#[should_panic(expected = "invalid schema literal")]
fn test_must_parse_panics_on_invalid() {
    must_parse(r#"{"type": "record", "name": "Broken"}"#);
}

// ============================================================================
// End-to-End Schema Tests
// ============================================================================

#[test]
fn test_parse_interop_style_schema() {
    let json = r#"{
        "type": "record",
        "name": "Interop",
        "namespace": "org.apache.avro",
        "fields": [
            {"name": "intField", "type": "int"},
            {"name": "longField", "type": "long"},
            {"name": "stringField", "type": "string"},
            {"name": "boolField", "type": "boolean"},
            {"name": "floatField", "type": "float"},
            {"name": "doubleField", "type": "double"},
            {"name": "bytesField", "type": "bytes"},
            {"name": "nullField", "type": "null"},
            {"name": "arrayField", "type": {"type": "array", "items": "double"}},
            {
                "name": "mapField",
                "type": {
                    "type": "map",
                    "values": {
                        "type": "record",
                        "name": "Foo",
                        "fields": [{"name": "label", "type": "string"}]
                    }
                }
            },
            {"name": "unionField", "type": ["boolean", "double", {"type": "array", "items": "bytes"}]},
            {
                "name": "enumField",
                "type": {"type": "enum", "name": "Kind", "symbols": ["A", "B", "C"]}
            },
            {
                "name": "fixedField",
                "type": {"type": "fixed", "name": "MD5", "size": 16}
            },
            {
                "name": "recordField",
                "type": {
                    "type": "record",
                    "name": "Node",
                    "fields": [
                        {"name": "label", "type": "string"},
                        {"name": "child", "type": {"type": "org.apache.avro.Node"}},
                        {"name": "children", "type": {"type": "array", "items": "Node"}}
                    ]
                }
            }
        ]
    }"#;

    let schema = parse(json).unwrap();
    let record = match &schema {
        Schema::Record(r) => r,
        other => panic!("Expected Record schema, got {:?}", other),
    };
    assert_eq!(record.fullname(), "org.apache.avro.Interop");
    assert_eq!(record.fields().len(), 14);

    // Nested named types inherit the namespace.
    assert_eq!(
        record.field("enumField").unwrap().schema().fullname(),
        Some("org.apache.avro.Kind")
    );
    assert_eq!(
        record.field("fixedField").unwrap().schema().fullname(),
        Some("org.apache.avro.MD5")
    );

    // An object whose type is a defined full name is the reference form.
    let node = match record.field("recordField").unwrap().schema() {
        Schema::Record(node) => node,
        other => panic!("Expected Record schema, got {:?}", other),
    };
    match node.field("child").unwrap().schema() {
        Schema::Ref(reference) => assert_eq!(reference.fullname(), "org.apache.avro.Node"),
        other => panic!("Expected reference schema, got {:?}", other),
    }

    // Canonical form is stable and whitespace-free, with references
    // rendered as their quoted full names.
    let canonical = schema.canonical_form();
    assert!(!canonical.contains(' '));
    assert!(!canonical.contains('\n'));
    assert!(canonical.contains(r#"{"name":"child","type":"org.apache.avro.Node"}"#));
    assert_eq!(parse(&canonical).unwrap().canonical_form(), canonical);
}
