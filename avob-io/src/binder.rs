//! Schema binding
//!
//! Normalizes the accepted schema reference shapes (pre-built handle,
//! structured mapping, text reference) into an immutable [`SchemaHandle`].
//! Text references go through the same resolver chain as data sources, so
//! a schema can live in a file or behind a URL exactly like the data.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::resolver::ResolverRegistry;
use avob_codec::{parse_schema_text, SchemaHandle};
use avob_format::{AvobError, Result};

/// A schema reference as accepted at construction time.
#[derive(Debug, Clone)]
pub enum SchemaRef {
    /// An already-bound handle; returned unchanged.
    Handle(SchemaHandle),
    /// A structured mapping describing the schema.
    Mapping(JsonValue),
    /// Schema text, a file path, or a URL.
    Text(String),
}

impl From<SchemaHandle> for SchemaRef {
    fn from(handle: SchemaHandle) -> Self {
        SchemaRef::Handle(handle)
    }
}

impl From<JsonValue> for SchemaRef {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::String(text) => SchemaRef::Text(text),
            other => SchemaRef::Mapping(other),
        }
    }
}

impl From<&str> for SchemaRef {
    fn from(text: &str) -> Self {
        SchemaRef::Text(text.to_string())
    }
}

impl From<String> for SchemaRef {
    fn from(text: String) -> Self {
        SchemaRef::Text(text)
    }
}

/// Binds schema references against a resolver registry.
pub struct SchemaBinder<'a> {
    registry: &'a ResolverRegistry,
}

impl<'a> SchemaBinder<'a> {
    /// Binder resolving text references through `registry`.
    pub fn new(registry: &'a ResolverRegistry) -> Self {
        Self { registry }
    }

    /// Bind a schema reference to a handle.
    ///
    /// Every failure is a [`AvobError::SchemaBind`] carrying the resolver
    /// or parser message; no partial handle is ever produced.
    pub fn bind(&self, schema: SchemaRef) -> Result<SchemaHandle> {
        match schema {
            SchemaRef::Handle(handle) => Ok(handle),
            SchemaRef::Mapping(value) => {
                let text = serde_json::to_string(&value)
                    .map_err(|e| AvobError::SchemaBind(e.to_string()))?;
                parse_schema_text(&text)
            }
            SchemaRef::Text(reference) => {
                let resolved = self
                    .registry
                    .resolve(&reference)
                    .map_err(|e| AvobError::SchemaBind(e.to_string()))?;
                debug!(descriptor = ?resolved.descriptor, "schema reference resolved");
                parse_schema_text(&resolved.content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const USER_SCHEMA: &str = r#"{
        "type": "record",
        "name": "User",
        "fields": [
            {"name": "UserName", "type": "string"},
            {"name": "Age", "type": ["int", "null"]},
            {"name": "Active", "type": "boolean"}
        ]
    }"#;

    #[test]
    fn test_handle_passes_through_shared() {
        let registry = ResolverRegistry::default();
        let binder = SchemaBinder::new(&registry);

        let handle = parse_schema_text(USER_SCHEMA).unwrap();
        let bound = binder.bind(SchemaRef::Handle(handle.clone())).unwrap();
        assert!(handle.ptr_eq(&bound));
    }

    #[test]
    fn test_mapping_binds() {
        let registry = ResolverRegistry::default();
        let binder = SchemaBinder::new(&registry);

        let mapping = json!({
            "type": "record",
            "name": "Point",
            "fields": [
                {"name": "x", "type": "double"},
                {"name": "y", "type": "double"}
            ]
        });
        let handle = binder.bind(SchemaRef::from(mapping)).unwrap();
        assert_eq!(handle.name(), "Point");
        assert_eq!(handle.fields().len(), 2);
    }

    #[test]
    fn test_text_binding_is_idempotent() {
        let registry = ResolverRegistry::default();
        let binder = SchemaBinder::new(&registry);

        let first = binder.bind(SchemaRef::from(USER_SCHEMA)).unwrap();
        let second = binder.bind(SchemaRef::from(USER_SCHEMA)).unwrap();
        assert!(!first.ptr_eq(&second));
        assert_eq!(first.fields(), second.fields());
        assert_eq!(first.name(), second.name());
    }

    #[test]
    fn test_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", USER_SCHEMA).unwrap();

        let registry = ResolverRegistry::default();
        let binder = SchemaBinder::new(&registry);
        let handle = binder
            .bind(SchemaRef::from(file.path().to_str().unwrap()))
            .unwrap();
        assert_eq!(handle.name(), "User");
    }

    #[test]
    fn test_unparsable_reference_is_bind_error() {
        let registry = ResolverRegistry::default();
        let binder = SchemaBinder::new(&registry);

        let err = binder.bind(SchemaRef::from("not a schema")).unwrap_err();
        assert!(matches!(err, AvobError::SchemaBind(_)));

        let err = binder
            .bind(SchemaRef::from(json!({"type": "recoord"})))
            .unwrap_err();
        assert!(matches!(err, AvobError::SchemaBind(_)));
    }
}
