//! Schema-directed conversion between JSON values and Avro values
//!
//! Walking the schema and the JSON value together is what validation means
//! here: a conversion failure carries the field path and both types, and a
//! successful conversion is exactly a value that conforms to the schema.

use std::collections::HashMap;

use apache_avro::schema::Schema;
use apache_avro::types::Value as AvroValue;
use serde_json::{Number, Value as JsonValue};

use crate::schema::type_label;
use avob_format::{AvobError, Result};

/// Convert a JSON value into an Avro value guided by `schema`.
///
/// `path` names the position inside the enclosing record for error text;
/// pass `""` at the top level.
pub fn json_to_avro(value: &JsonValue, schema: &Schema, path: &str) -> Result<AvroValue> {
    match schema {
        Schema::Null => match value {
            JsonValue::Null => Ok(AvroValue::Null),
            other => Err(mismatch(path, "null", other)),
        },
        Schema::Boolean => match value {
            JsonValue::Bool(b) => Ok(AvroValue::Boolean(*b)),
            other => Err(mismatch(path, "boolean", other)),
        },
        Schema::Int => match integer_of(value) {
            Some(n) => i32::try_from(n)
                .map(AvroValue::Int)
                .map_err(|_| mismatch(path, "int", value)),
            None => Err(mismatch(path, "int", value)),
        },
        Schema::Long => match integer_of(value) {
            Some(n) => Ok(AvroValue::Long(n)),
            None => Err(mismatch(path, "long", value)),
        },
        Schema::Float => match value.as_f64() {
            Some(n) => Ok(AvroValue::Float(n as f32)),
            None => Err(mismatch(path, "float", value)),
        },
        Schema::Double => match value.as_f64() {
            Some(n) => Ok(AvroValue::Double(n)),
            None => Err(mismatch(path, "double", value)),
        },
        Schema::String | Schema::Uuid => match value {
            JsonValue::String(s) => Ok(AvroValue::String(s.clone())),
            other => Err(mismatch(path, "string", other)),
        },
        Schema::Bytes => byte_sequence(value, path, "bytes").map(AvroValue::Bytes),
        Schema::Fixed(fixed) => {
            let bytes = byte_sequence(value, path, "fixed")?;
            if bytes.len() != fixed.size {
                return Err(AvobError::SchemaValidation(format!(
                    "{}: fixed of size {} given {} bytes",
                    at(path),
                    fixed.size,
                    bytes.len()
                )));
            }
            Ok(AvroValue::Fixed(fixed.size, bytes))
        }
        Schema::Enum(en) => match value {
            JsonValue::String(s) => match en.symbols.iter().position(|sym| sym == s) {
                Some(idx) => Ok(AvroValue::Enum(idx as u32, s.clone())),
                None => Err(AvobError::SchemaValidation(format!(
                    "{}: \"{}\" is not a symbol of enum {}",
                    at(path),
                    s,
                    en.name.name
                ))),
            },
            other => Err(mismatch(path, "enum symbol", other)),
        },
        Schema::Array(array) => match value {
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| json_to_avro(item, &array.items, &child(path, &i.to_string())))
                .collect::<Result<Vec<_>>>()
                .map(AvroValue::Array),
            other => Err(mismatch(path, "array", other)),
        },
        Schema::Map(map) => match value {
            JsonValue::Object(entries) => {
                let mut out = HashMap::with_capacity(entries.len());
                for (k, v) in entries {
                    out.insert(k.clone(), json_to_avro(v, &map.types, &child(path, k))?);
                }
                Ok(AvroValue::Map(out))
            }
            other => Err(mismatch(path, "map", other)),
        },
        Schema::Union(union) => {
            for (idx, branch) in union.variants().iter().enumerate() {
                if let Ok(converted) = json_to_avro(value, branch, path) {
                    return Ok(AvroValue::Union(idx as u32, Box::new(converted)));
                }
            }
            Err(AvobError::SchemaValidation(format!(
                "{}: no branch of union [{}] matched {}",
                at(path),
                type_label(schema),
                describe(value)
            )))
        }
        Schema::Record(record) => match value {
            JsonValue::Object(entries) => {
                let mut fields = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    let field_path = child(path, &field.name);
                    let converted = match entries.get(&field.name) {
                        Some(present) => json_to_avro(present, &field.schema, &field_path)?,
                        None => absent_field_value(field, &field_path)?,
                    };
                    fields.push((field.name.clone(), converted));
                }
                Ok(AvroValue::Record(fields))
            }
            other => Err(mismatch(path, &format!("record {}", record.name.name), other)),
        },
        Schema::Date => match integer_of(value) {
            Some(n) => i32::try_from(n)
                .map(AvroValue::Date)
                .map_err(|_| mismatch(path, "date", value)),
            None => Err(mismatch(path, "date", value)),
        },
        Schema::TimeMillis => match integer_of(value) {
            Some(n) => i32::try_from(n)
                .map(AvroValue::TimeMillis)
                .map_err(|_| mismatch(path, "time-millis", value)),
            None => Err(mismatch(path, "time-millis", value)),
        },
        Schema::TimeMicros => timestamp_of(value, path, "time-micros").map(AvroValue::TimeMicros),
        Schema::TimestampMillis => {
            timestamp_of(value, path, "timestamp-millis").map(AvroValue::TimestampMillis)
        }
        Schema::TimestampMicros => {
            timestamp_of(value, path, "timestamp-micros").map(AvroValue::TimestampMicros)
        }
        other => Err(AvobError::SchemaValidation(format!(
            "{}: schema type {} is not supported",
            at(path),
            type_label(other)
        ))),
    }
}

/// Convert a decoded Avro value back into a JSON value.
///
/// Unions unwrap to their inner value, bytes render as arrays of numbers and
/// enums render as their symbol, so the result matches what the JSON-side
/// conversion accepts.
pub fn avro_to_json(value: AvroValue) -> Result<JsonValue> {
    match value {
        AvroValue::Null => Ok(JsonValue::Null),
        AvroValue::Boolean(b) => Ok(JsonValue::Bool(b)),
        AvroValue::Int(i) => Ok(JsonValue::Number(i.into())),
        AvroValue::Long(i) => Ok(JsonValue::Number(i.into())),
        AvroValue::Float(f) => finite_number(f as f64),
        AvroValue::Double(f) => finite_number(f),
        AvroValue::Bytes(b) | AvroValue::Fixed(_, b) => Ok(JsonValue::Array(
            b.into_iter().map(|byte| JsonValue::Number(byte.into())).collect(),
        )),
        AvroValue::String(s) | AvroValue::Enum(_, s) => Ok(JsonValue::String(s)),
        AvroValue::Union(_, inner) => avro_to_json(*inner),
        AvroValue::Array(items) => items
            .into_iter()
            .map(avro_to_json)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        AvroValue::Map(entries) => {
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, avro_to_json(v)?);
            }
            Ok(JsonValue::Object(out))
        }
        AvroValue::Record(fields) => {
            let mut out = serde_json::Map::with_capacity(fields.len());
            for (k, v) in fields {
                out.insert(k, avro_to_json(v)?);
            }
            Ok(JsonValue::Object(out))
        }
        AvroValue::Date(d) => Ok(JsonValue::Number(d.into())),
        AvroValue::TimeMillis(t) => Ok(JsonValue::Number(t.into())),
        AvroValue::TimeMicros(t)
        | AvroValue::TimestampMillis(t)
        | AvroValue::TimestampMicros(t) => Ok(JsonValue::Number(t.into())),
        AvroValue::Uuid(u) => Ok(JsonValue::String(u.to_string())),
        other => Err(AvobError::BinaryDecode(format!(
            "container value has no JSON rendering: {:?}",
            other
        ))),
    }
}

fn integer_of(value: &JsonValue) -> Option<i64> {
    if value.is_i64() || value.is_u64() {
        value.as_i64()
    } else {
        None
    }
}

fn timestamp_of(value: &JsonValue, path: &str, expected: &str) -> Result<i64> {
    integer_of(value).ok_or_else(|| mismatch(path, expected, value))
}

fn byte_sequence(value: &JsonValue, path: &str, expected: &str) -> Result<Vec<u8>> {
    match value {
        JsonValue::String(s) => Ok(s.clone().into_bytes()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| mismatch(path, expected, value))
            })
            .collect(),
        other => Err(mismatch(path, expected, other)),
    }
}

fn absent_field_value(
    field: &apache_avro::schema::RecordField,
    path: &str,
) -> Result<AvroValue> {
    if let Some(default) = &field.default {
        return json_to_avro(default, &field.schema, path);
    }
    match &field.schema {
        Schema::Null => Ok(AvroValue::Null),
        Schema::Union(union) => {
            match union.variants().iter().position(|v| matches!(v, Schema::Null)) {
                Some(idx) => Ok(AvroValue::Union(idx as u32, Box::new(AvroValue::Null))),
                None => Err(missing(path)),
            }
        }
        _ => Err(missing(path)),
    }
}

fn missing(path: &str) -> AvobError {
    AvobError::SchemaValidation(format!("{}: required field is missing", at(path)))
}

fn mismatch(path: &str, expected: &str, got: &JsonValue) -> AvobError {
    AvobError::SchemaValidation(format!(
        "{}: expected {}, got {}",
        at(path),
        expected,
        describe(got)
    ))
}

fn at(path: &str) -> String {
    if path.is_empty() {
        "value".to_string()
    } else {
        format!("field {}", path)
    }
}

fn child(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => format!("boolean {}", b),
        JsonValue::Number(n) => format!("number {}", n),
        JsonValue::String(s) => format!("string \"{}\"", s),
        JsonValue::Array(_) => "array".to_string(),
        JsonValue::Object(_) => "object".to_string(),
    }
}

fn finite_number(f: f64) -> Result<JsonValue> {
    Number::from_f64(f)
        .map(JsonValue::Number)
        .ok_or_else(|| AvobError::BinaryDecode("non-finite float in container".to_string()))
}
