//! Negative-path tests covering the error taxonomy

use avob_format::constants::CONTAINER_MAGIC_PREFIX;
use avob_io::{AvobError, CanonicalObject, ObjectOptions};
use serde_json::json;

#[test]
fn invalid_utf8_bytes_are_a_text_decode_error() {
    let object = CanonicalObject::new(vec![0xC3u8, 0x28, 0xA0, 0xA1]);
    assert!(!object.ok());
    assert!(object.value().is_none());
    assert!(matches!(object.last_error(), Some(AvobError::TextDecode(_))));
}

#[test]
fn magic_with_corrupt_body_is_a_binary_decode_error() {
    let mut bytes = CONTAINER_MAGIC_PREFIX.to_vec();
    bytes.extend_from_slice(b"\x02garbage that is not a container body");

    let object = CanonicalObject::new(bytes);
    assert!(!object.ok());
    assert!(matches!(
        object.last_error(),
        Some(AvobError::BinaryDecode(_))
    ));
}

#[test]
fn unparsable_text_is_a_json_parse_error() {
    let object = CanonicalObject::new("definitely not json");
    assert!(!object.ok());
    assert!(object.value().is_none());
    assert!(matches!(object.last_error(), Some(AvobError::JsonParse(_))));
}

#[test]
fn missing_file_ends_as_a_json_parse_error() {
    // The file strategy declines a path that does not exist; the literal
    // fallback then fails the JSON check.
    let object = CanonicalObject::new("/no/such/path/data.json");
    assert!(matches!(object.last_error(), Some(AvobError::JsonParse(_))));
}

#[test]
fn unreachable_url_is_a_source_fetch_error() {
    let options = ObjectOptions {
        fetch_timeout: std::time::Duration::from_millis(500),
    };
    let object = CanonicalObject::with_options("http://127.0.0.1:1/data.json", None, options);
    assert!(!object.ok());
    assert!(matches!(
        object.last_error(),
        Some(AvobError::SourceFetch(_))
    ));
}

#[test]
fn bad_schema_reference_is_recorded_but_data_still_parses() {
    let object = CanonicalObject::with_schema(r#"{"a": 1}"#, "no such schema");
    assert!(!object.ok());
    assert!(matches!(object.last_error(), Some(AvobError::SchemaBind(_))));
    // The value is parsed schema-less so it stays inspectable.
    assert_eq!(object.value(), Some(&json!({"a": 1})));
}

#[test]
fn binary_export_without_schema_requires_one() {
    let mut object = CanonicalObject::new(json!({"a": 1}));
    assert!(object.ok());

    assert!(object.to_binary().is_none());
    assert!(matches!(
        object.last_error(),
        Some(AvobError::SchemaRequired)
    ));
    // The failure is recorded on the instance.
    assert!(!object.ok());
}

#[test]
fn export_after_failed_parse_is_a_precondition_error() {
    let mut object = CanonicalObject::new("not json");
    assert!(matches!(object.last_error(), Some(AvobError::JsonParse(_))));

    assert!(object.to_json().is_none());
    assert!(matches!(
        object.last_error(),
        Some(AvobError::ExportPrecondition(_))
    ));
}

#[test]
fn export_after_failed_validation_is_a_precondition_error() {
    const SCHEMA: &str = r#"{
        "type": "record",
        "name": "Counted",
        "fields": [{"name": "n", "type": "int"}]
    }"#;
    let mut object = CanonicalObject::with_schema(r#"{"n": "ten"}"#, SCHEMA);
    assert!(!object.ok());
    assert!(object.value().is_some());

    assert!(object.to_binary().is_none());
    assert!(matches!(
        object.last_error(),
        Some(AvobError::ExportPrecondition(_))
    ));
}

#[test]
fn scalar_input_is_invalid() {
    for input in [json!(42), json!(true), json!(null)] {
        let object = CanonicalObject::new(input);
        assert!(!object.ok());
        assert!(matches!(
            object.last_error(),
            Some(AvobError::InvalidInput(_))
        ));
    }
}
