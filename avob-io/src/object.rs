//! The canonical object facade
//!
//! A [`CanonicalObject`] is built in one pass from any supported input
//! shape. Construction classifies the input (container bytes, JSON text,
//! native value), resolves and binds schemas as needed, validates when a
//! schema is present, and records the outcome on the instance. After
//! construction the only mutation is populating the two export caches and
//! the last-error slot.

use std::fmt;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::binder::{SchemaBinder, SchemaRef};
use crate::export::ExportCache;
use crate::resolver::ResolverRegistry;
use crate::ObjectOptions;
use avob_codec::{decode_container, json_to_avro, SchemaHandle, SchemaKind};
use avob_format::{has_container_magic, is_container_prefix, AvobError, Origin};

/// Constructor input, decided once at the boundary.
#[derive(Debug)]
pub enum Input {
    /// Raw bytes: an Avro container, or UTF-8 JSON text.
    Bytes(Vec<u8>),
    /// Literal JSON text, a file path, or a URL.
    Text(String),
    /// An already-structured value (mapping or sequence).
    Value(JsonValue),
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl From<&[u8]> for Input {
    fn from(bytes: &[u8]) -> Self {
        Input::Bytes(bytes.to_vec())
    }
}

impl From<JsonValue> for Input {
    fn from(value: JsonValue) -> Self {
        match value {
            // A JSON string input is a source reference, same as `&str`.
            JsonValue::String(text) => Input::Text(text),
            other => Input::Value(other),
        }
    }
}

/// One logical object, normalized from any supported representation.
pub struct CanonicalObject {
    pub(crate) origin: Origin,
    pub(crate) schema: Option<SchemaHandle>,
    pub(crate) value: Option<JsonValue>,
    pub(crate) ok: bool,
    pub(crate) last_error: Option<AvobError>,
    pub(crate) source_text: Option<String>,
    pub(crate) exports: ExportCache,
}

impl CanonicalObject {
    /// Normalize an input with no schema, using default options.
    pub fn new(input: impl Into<Input>) -> Self {
        Self::with_options(input, None, ObjectOptions::default())
    }

    /// Normalize an input and bind the given schema reference.
    pub fn with_schema(input: impl Into<Input>, schema: impl Into<SchemaRef>) -> Self {
        Self::with_options(input, Some(schema.into()), ObjectOptions::default())
    }

    /// Normalize an input with explicit options.
    pub fn with_options(
        input: impl Into<Input>,
        schema: Option<SchemaRef>,
        options: ObjectOptions,
    ) -> Self {
        let registry = ResolverRegistry::new(options.fetch_timeout);
        Self::with_resolver(input, schema, &registry)
    }

    /// Normalize an input resolving all source references through a
    /// caller-owned registry.
    pub fn with_resolver(
        input: impl Into<Input>,
        schema: Option<SchemaRef>,
        registry: &ResolverRegistry,
    ) -> Self {
        let mut object = CanonicalObject {
            origin: Origin::Native,
            schema: None,
            value: None,
            ok: false,
            last_error: None,
            source_text: None,
            exports: ExportCache::default(),
        };

        if let Some(reference) = schema {
            match SchemaBinder::new(registry).bind(reference) {
                Ok(handle) => object.schema = Some(handle),
                // The data is still parsed schema-less below so the decoded
                // value stays inspectable; `ok` remains false.
                Err(err) => object.last_error = Some(err),
            }
        }

        match input.into() {
            Input::Bytes(bytes) => object.ingest_bytes(bytes, registry),
            Input::Text(text) => object.ingest_text(text, registry),
            Input::Value(value) => object.ingest_native(value),
        }

        debug!(origin = ?object.origin, ok = object.ok, "canonical object constructed");
        object
    }

    /// Whether the given bytes carry the container file magic.
    pub fn is_container(bytes: &[u8]) -> bool {
        has_container_magic(bytes)
    }

    /// Whether a canonical value is present and conforming.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Which input pathway produced this object.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The bound schema, if any.
    pub fn schema(&self) -> Option<&SchemaHandle> {
        self.schema.as_ref()
    }

    /// The canonical value, when parsing succeeded.
    ///
    /// Present even when validation failed; only parse failures leave it
    /// empty.
    pub fn value(&self) -> Option<&JsonValue> {
        self.value.as_ref()
    }

    /// The most recent parse or export failure.
    pub fn last_error(&self) -> Option<&AvobError> {
        self.last_error.as_ref()
    }

    fn ingest_bytes(&mut self, bytes: Vec<u8>, registry: &ResolverRegistry) {
        if is_container_prefix(&bytes) || has_container_magic(&bytes) {
            self.origin = Origin::Binary;
            match decode_container(&bytes) {
                Ok(decoded) => {
                    // The container is self-describing; its schema
                    // supersedes a caller-supplied one.
                    self.schema = Some(decoded.schema);
                    self.value = Some(collapse(decoded.records));
                    self.ok = self.last_error.is_none();
                }
                Err(err) => self.fail(err),
            }
            return;
        }
        match String::from_utf8(bytes) {
            Ok(text) => self.ingest_text(text, registry),
            Err(err) => {
                self.origin = Origin::Binary;
                self.fail(AvobError::TextDecode(err.to_string()));
            }
        }
    }

    fn ingest_text(&mut self, source: String, registry: &ResolverRegistry) {
        match registry.resolve(&source) {
            Ok(resolved) => {
                self.origin = resolved.descriptor.origin();
                match serde_json::from_str::<JsonValue>(&resolved.content) {
                    Ok(value) => {
                        self.source_text = Some(resolved.content);
                        self.accept_value(value);
                    }
                    Err(err) => self.fail(AvobError::json_parse(&err)),
                }
            }
            Err(err) => {
                self.origin = Origin::JsonText;
                self.fail(err);
            }
        }
    }

    fn ingest_native(&mut self, value: JsonValue) {
        self.origin = Origin::Native;
        match value {
            JsonValue::Object(_) | JsonValue::Array(_) => self.accept_value(value),
            other => self.fail(AvobError::InvalidInput(format!(
                "expected a mapping or sequence, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn accept_value(&mut self, value: JsonValue) {
        if let Some(schema) = self.schema.clone() {
            if let Err(err) = validate(&value, &schema) {
                // Validation failure is not a parse failure; the decoded
                // value stays accessible.
                self.value = Some(value);
                self.fail(err);
                return;
            }
        }
        self.value = Some(value);
        self.ok = self.last_error.is_none();
    }

    pub(crate) fn fail(&mut self, err: AvobError) {
        self.ok = false;
        self.last_error = Some(err);
    }
}

impl fmt::Display for CanonicalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.schema.as_ref().map(|s| s.name()).unwrap_or("-");
        let status = if self.ok { "OK" } else { "ERROR" };
        match &self.value {
            Some(value) => write!(f, "CanonicalObject({}:{}) = {}", name, status, value),
            None => write!(f, "CanonicalObject({}:{})", name, status),
        }
    }
}

/// View a value as the record sequence the container writer operates on:
/// a sequence value is one record per element (unless the schema itself is
/// an array schema), a null value is the empty sequence it was decoded
/// from, anything else is a single record.
pub(crate) fn as_records<'v>(value: &'v JsonValue, schema: &SchemaHandle) -> &'v [JsonValue] {
    match value {
        JsonValue::Null => &[],
        JsonValue::Array(items) if schema.kind() != SchemaKind::Array => items,
        single => std::slice::from_ref(single),
    }
}

fn validate(value: &JsonValue, schema: &SchemaHandle) -> avob_format::Result<()> {
    for record in as_records(value, schema) {
        json_to_avro(record, schema.avro_schema(), "")?;
    }
    Ok(())
}

fn collapse(mut records: Vec<JsonValue>) -> JsonValue {
    // A single decoded record is the value itself, never a one-element
    // sequence; an empty container is a valid null result.
    match records.len() {
        0 => JsonValue::Null,
        1 => records.remove(0),
        _ => JsonValue::Array(records),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a sequence",
        JsonValue::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collapse_rules() {
        assert_eq!(collapse(vec![]), JsonValue::Null);
        assert_eq!(collapse(vec![json!({"a": 1})]), json!({"a": 1}));
        assert_eq!(
            collapse(vec![json!({"a": 1}), json!({"a": 2})]),
            json!([{"a": 1}, {"a": 2}])
        );
    }

    #[test]
    fn test_input_from_json_string_is_text() {
        let input = Input::from(json!("{\"a\": 1}"));
        assert!(matches!(input, Input::Text(_)));
    }

    #[test]
    fn test_scalar_native_input_is_invalid() {
        let object = CanonicalObject::new(json!(42));
        assert!(!object.ok());
        assert!(object.value().is_none());
        assert!(matches!(
            object.last_error(),
            Some(AvobError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_display_states() {
        let object = CanonicalObject::new(json!({"a": 1}));
        assert_eq!(object.to_string(), "CanonicalObject(-:OK) = {\"a\":1}");
    }
}
