//! Schema handles and schema parsing

use std::sync::Arc;

use apache_avro::Schema;
use serde_json::{json, Value};

use avob_format::{AvobError, Result};

/// Broad shape of a bound schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// A named record with fields.
    Record,
    /// An array of items.
    Array,
    /// Any other Avro type (primitives, maps, unions, ...).
    Scalar,
}

#[derive(Debug)]
struct HandleInner {
    name: String,
    namespace: Option<String>,
    kind: SchemaKind,
    fields: Vec<(String, String)>,
    schema: Schema,
}

/// Immutable, cheaply clonable handle to a parsed Avro schema.
///
/// Created once by the binder (or recovered from container metadata) and
/// shared by reference between every facade instance bound to it.
#[derive(Debug, Clone)]
pub struct SchemaHandle {
    inner: Arc<HandleInner>,
}

impl SchemaHandle {
    /// Build a handle around an already-parsed schema.
    pub fn from_avro(schema: Schema) -> Self {
        let (name, namespace) = schema_identity(&schema);
        let kind = match schema {
            Schema::Record(_) => SchemaKind::Record,
            Schema::Array(_) => SchemaKind::Array,
            _ => SchemaKind::Scalar,
        };
        let fields = match &schema {
            Schema::Record(record) => record
                .fields
                .iter()
                .map(|f| (f.name.clone(), type_label(&f.schema)))
                .collect(),
            _ => Vec::new(),
        };
        SchemaHandle {
            inner: Arc::new(HandleInner {
                name,
                namespace,
                kind,
                fields,
                schema,
            }),
        }
    }

    /// Schema name (record/enum/fixed name, or the type label otherwise).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Namespace of a named schema, when declared.
    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace.as_deref()
    }

    /// Broad schema shape.
    pub fn kind(&self) -> SchemaKind {
        self.inner.kind
    }

    /// Ordered (field name, type label) pairs; empty for non-records.
    pub fn fields(&self) -> &[(String, String)] {
        &self.inner.fields
    }

    /// The underlying parsed schema.
    pub fn avro_schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// Whether two handles share the same parsed schema instance.
    pub fn ptr_eq(&self, other: &SchemaHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Parse Avro schema text into a handle.
///
/// Any parser failure is a [`AvobError::SchemaBind`]; no partial handle is
/// ever returned.
pub fn parse_schema_text(text: &str) -> Result<SchemaHandle> {
    let schema = Schema::parse_str(text).map_err(|e| AvobError::SchemaBind(e.to_string()))?;
    Ok(SchemaHandle::from_avro(schema))
}

fn schema_identity(schema: &Schema) -> (String, Option<String>) {
    match schema {
        Schema::Record(record) => (record.name.name.clone(), record.name.namespace.clone()),
        Schema::Enum(en) => (en.name.name.clone(), en.name.namespace.clone()),
        Schema::Fixed(fixed) => (fixed.name.name.clone(), fixed.name.namespace.clone()),
        other => (type_label(other), None),
    }
}

/// Compact human-readable label for a schema, used in field listings and
/// validation messages.
pub fn type_label(schema: &Schema) -> String {
    match schema {
        Schema::Null => "null".to_string(),
        Schema::Boolean => "boolean".to_string(),
        Schema::Int => "int".to_string(),
        Schema::Long => "long".to_string(),
        Schema::Float => "float".to_string(),
        Schema::Double => "double".to_string(),
        Schema::Bytes => "bytes".to_string(),
        Schema::String => "string".to_string(),
        Schema::Uuid => "uuid".to_string(),
        Schema::Date => "date".to_string(),
        Schema::TimeMillis => "time-millis".to_string(),
        Schema::TimeMicros => "time-micros".to_string(),
        Schema::TimestampMillis => "timestamp-millis".to_string(),
        Schema::TimestampMicros => "timestamp-micros".to_string(),
        Schema::Duration => "duration".to_string(),
        Schema::Decimal(_) => "decimal".to_string(),
        Schema::Array(array) => format!("array<{}>", type_label(&array.items)),
        Schema::Map(map) => format!("map<{}>", type_label(&map.types)),
        Schema::Union(union) => union
            .variants()
            .iter()
            .map(type_label)
            .collect::<Vec<_>>()
            .join("|"),
        Schema::Record(record) => record.name.name.clone(),
        Schema::Enum(en) => en.name.name.clone(),
        Schema::Fixed(fixed) => fixed.name.name.clone(),
        Schema::Ref { name } => name.name.clone(),
        _ => "complex".to_string(),
    }
}

/// Infer a schema from a sample value.
///
/// Objects become records (recursively for object-valued fields), arrays
/// become array schemas keyed on their first element, and JSON scalars map
/// onto the widest matching Avro primitive. The inferred schema is parsed
/// back through the regular schema parser, so the result is always a
/// well-formed handle.
pub fn infer_schema(value: &Value, name: &str, namespace: Option<&str>) -> Result<SchemaHandle> {
    if name.is_empty() {
        return Err(AvobError::SchemaBind(
            "schema inference requires a non-empty name".to_string(),
        ));
    }
    let mut doc = infer_type(value, name);
    if let (Some(ns), Value::Object(map)) = (namespace, &mut doc) {
        if map.get("type") == Some(&json!("record")) {
            map.insert("namespace".to_string(), json!(ns));
        }
    }
    let text = serde_json::to_string(&doc).map_err(|e| AvobError::SchemaBind(e.to_string()))?;
    parse_schema_text(&text)
}

fn infer_type(value: &Value, name: &str) -> Value {
    match value {
        Value::Null => json!("null"),
        Value::Bool(_) => json!("boolean"),
        Value::Number(n) if n.is_f64() => json!("double"),
        Value::Number(_) => json!("long"),
        Value::String(_) => json!("string"),
        Value::Array(items) => {
            let items_type = items
                .first()
                .map(|v| infer_type(v, name))
                .unwrap_or_else(|| json!("string"));
            json!({ "type": "array", "items": items_type })
        }
        Value::Object(map) => {
            let fields: Vec<Value> = map
                .iter()
                .map(|(k, v)| json!({ "name": k, "type": infer_type(v, k) }))
                .collect();
            json!({ "type": "record", "name": name, "fields": fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_SCHEMA: &str = r#"{
        "type": "record",
        "name": "User",
        "namespace": "avro.example",
        "fields": [
            {"name": "UserName", "type": "string"},
            {"name": "Age", "type": ["int", "null"]},
            {"name": "Active", "type": "boolean"}
        ]
    }"#;

    #[test]
    fn test_parse_record_schema() {
        let handle = parse_schema_text(USER_SCHEMA).unwrap();
        assert_eq!(handle.name(), "User");
        assert_eq!(handle.namespace(), Some("avro.example"));
        assert_eq!(handle.kind(), SchemaKind::Record);
        assert_eq!(
            handle.fields(),
            &[
                ("UserName".to_string(), "string".to_string()),
                ("Age".to_string(), "int|null".to_string()),
                ("Active".to_string(), "boolean".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_schema() {
        let err = parse_schema_text("{\"type\": \"recoord\"}").unwrap_err();
        assert!(matches!(err, AvobError::SchemaBind(_)));
    }

    #[test]
    fn test_parse_scalar_and_array_kinds() {
        let scalar = parse_schema_text("\"string\"").unwrap();
        assert_eq!(scalar.kind(), SchemaKind::Scalar);
        assert_eq!(scalar.name(), "string");
        assert!(scalar.fields().is_empty());

        let array = parse_schema_text(r#"{"type": "array", "items": "long"}"#).unwrap();
        assert_eq!(array.kind(), SchemaKind::Array);
        assert_eq!(array.name(), "array<long>");
    }

    #[test]
    fn test_handle_sharing() {
        let handle = parse_schema_text(USER_SCHEMA).unwrap();
        let clone = handle.clone();
        assert!(handle.ptr_eq(&clone));

        let rebound = parse_schema_text(USER_SCHEMA).unwrap();
        assert!(!handle.ptr_eq(&rebound));
        assert_eq!(handle.fields(), rebound.fields());
    }

    #[test]
    fn test_infer_record_schema() {
        let sample = serde_json::json!({
            "UserName": "Guionardo",
            "Age": 42,
            "Active": true,
            "Address": {"City": "Florianopolis", "Zip": "88000"}
        });
        let handle = infer_schema(&sample, "User", Some("avro.example")).unwrap();
        assert_eq!(handle.kind(), SchemaKind::Record);
        assert_eq!(handle.namespace(), Some("avro.example"));
        let fields = handle.fields();
        assert!(fields.contains(&("UserName".to_string(), "string".to_string())));
        assert!(fields.contains(&("Age".to_string(), "long".to_string())));
        assert!(fields.contains(&("Active".to_string(), "boolean".to_string())));
        assert!(fields.contains(&("Address".to_string(), "Address".to_string())));
    }

    #[test]
    fn test_infer_requires_name() {
        let err = infer_schema(&serde_json::json!({"a": 1}), "", None).unwrap_err();
        assert!(matches!(err, AvobError::SchemaBind(_)));
    }

    #[test]
    fn test_infer_array_of_records() {
        let sample = serde_json::json!([{"id": 1}, {"id": 2}]);
        let handle = infer_schema(&sample, "Ids", None).unwrap();
        assert_eq!(handle.kind(), SchemaKind::Array);
    }
}
