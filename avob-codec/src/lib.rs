//! AVOB Codec - In-memory engines over the external Avro service
//!
//! This crate provides the schema and value machinery for the facade:
//!
//! - Immutable schema handles parsed from Avro schema text
//! - Schema-directed conversion between JSON values and Avro values
//!   (the validation surface)
//! - Object-container encode/decode over byte buffers
//! - Schema inference from sample values
//!
//! The wire-level container codec and the schema parser are consumed from
//! `apache-avro`, never reimplemented.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod container;
pub mod convert;
pub mod schema;

// Re-export commonly used types
pub use avob_format::{AvobError, Result};

// Re-export our own types
pub use container::{decode_container, encode_container, DecodedContainer};
pub use convert::{avro_to_json, json_to_avro};
pub use schema::{infer_schema, parse_schema_text, SchemaHandle, SchemaKind};
