//! Export memoization
//!
//! Both exports are computed at most once per instance; once a slot is
//! filled it is never recomputed or invalidated. Exports take `&mut self`,
//! so the non-atomic cache population cannot be raced from safe code; a
//! fully constructed instance stays freely shareable for reading until the
//! first export call.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::object::{as_records, CanonicalObject};
use avob_codec::{avro_to_json, encode_container, json_to_avro, SchemaKind};
use avob_format::{AvobError, Origin, Result};

/// Memoized export payloads; permanent for the instance lifetime.
#[derive(Debug, Default)]
pub(crate) struct ExportCache {
    pub(crate) json: Option<String>,
    pub(crate) binary: Option<Vec<u8>>,
}

impl CanonicalObject {
    /// Export the canonical value as JSON text.
    ///
    /// Returns `None` and records the failure when no conforming value is
    /// present. When the origin was literal JSON text, the original source
    /// is preserved byte-for-byte instead of being re-serialized. The
    /// first successful call caches its result; later calls return the
    /// cached text.
    pub fn to_json(&mut self) -> Option<&str> {
        if self.exports.json.is_none() {
            self.last_error = None;
            match self.compute_json() {
                Ok(text) => self.exports.json = Some(text),
                Err(err) => {
                    debug!(%err, "JSON export failed");
                    self.fail(err);
                    return None;
                }
            }
        }
        self.exports.json.as_deref()
    }

    /// Export the canonical value as an Avro object container.
    ///
    /// Requires a bound schema. A sequence value is written as one record
    /// per element; any other value is written as a single record. The
    /// first successful call caches the bytes; later calls return the
    /// cached payload.
    pub fn to_binary(&mut self) -> Option<&[u8]> {
        if self.exports.binary.is_none() {
            self.last_error = None;
            match self.compute_binary() {
                Ok(bytes) => self.exports.binary = Some(bytes),
                Err(err) => {
                    debug!(%err, "binary export failed");
                    self.fail(err);
                    return None;
                }
            }
        }
        self.exports.binary.as_deref()
    }

    fn exportable_value(&self) -> Result<&JsonValue> {
        let value = self.value.as_ref().ok_or_else(|| {
            AvobError::ExportPrecondition("no canonical value present".to_string())
        })?;
        if !self.ok {
            return Err(AvobError::ExportPrecondition(
                "canonical value did not pass validation".to_string(),
            ));
        }
        Ok(value)
    }

    fn compute_json(&self) -> Result<String> {
        let value = self.exportable_value()?;

        // An already-textual source is never re-serialized; re-encoding
        // would alter formatting and key order for no semantic gain.
        if self.origin == Origin::JsonText {
            if let Some(text) = &self.source_text {
                return Ok(text.clone());
            }
        }

        match &self.schema {
            Some(schema) => {
                let records = as_records(value, schema);
                let mut rendered = Vec::with_capacity(records.len());
                for record in records {
                    let avro = json_to_avro(record, schema.avro_schema(), "")?;
                    rendered.push(avro_to_json(avro)?);
                }
                let sequence = matches!(value, JsonValue::Array(_))
                    && schema.kind() != SchemaKind::Array;
                let normalized = if sequence {
                    JsonValue::Array(rendered)
                } else {
                    rendered.pop().unwrap_or(JsonValue::Null)
                };
                serde_json::to_string(&normalized).map_err(|e| AvobError::json_parse(&e))
            }
            None => serde_json::to_string(value).map_err(|e| AvobError::json_parse(&e)),
        }
    }

    fn compute_binary(&self) -> Result<Vec<u8>> {
        let value = self.exportable_value()?;
        let schema = self.schema.as_ref().ok_or(AvobError::SchemaRequired)?;
        encode_container(as_records(value, schema), schema)
    }
}
