//! Object-container encode/decode glue
//!
//! Wire-level parsing and writing stays inside `apache-avro`; this module
//! only moves values across the boundary and maps failures onto the AVOB
//! error taxonomy.

use apache_avro::{Reader, Writer};
use serde_json::Value as JsonValue;

use crate::convert::{avro_to_json, json_to_avro};
use crate::schema::SchemaHandle;
use avob_format::{AvobError, Result};

/// Outcome of decoding a container: the embedded schema and every record,
/// in file order.
#[derive(Debug)]
pub struct DecodedContainer {
    /// Handle rebound from the container's embedded schema text.
    pub schema: SchemaHandle,
    /// Decoded records as JSON values.
    pub records: Vec<JsonValue>,
}

/// Decode a full object container from bytes.
///
/// Any reader failure, from the header onwards, is a
/// [`AvobError::BinaryDecode`]; callers have already established that the
/// bytes carry the container magic.
pub fn decode_container(bytes: &[u8]) -> Result<DecodedContainer> {
    let reader = Reader::new(bytes)
        .map_err(|e| AvobError::BinaryDecode(format!("container header: {}", e)))?;
    let embedded = reader.writer_schema().clone();

    let mut records = Vec::new();
    for datum in reader {
        let value =
            datum.map_err(|e| AvobError::BinaryDecode(format!("container block: {}", e)))?;
        records.push(avro_to_json(value)?);
    }

    Ok(DecodedContainer {
        schema: SchemaHandle::from_avro(embedded),
        records,
    })
}

/// Encode records into an object container under the given schema.
///
/// Each record is converted through the schema-directed walk first, so a
/// non-conforming record surfaces as [`AvobError::SchemaValidation`] before
/// anything is written.
pub fn encode_container(records: &[JsonValue], schema: &SchemaHandle) -> Result<Vec<u8>> {
    let mut writer = Writer::new(schema.avro_schema(), Vec::new());
    for record in records {
        let avro = json_to_avro(record, schema.avro_schema(), "")?;
        writer
            .append(avro)
            .map_err(|e| AvobError::BinaryDecode(format!("container write: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AvobError::BinaryDecode(format!("container finish: {}", e)))
}
