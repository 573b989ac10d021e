//! Error types for the AVOB facade

use thiserror::Error;

/// AVOB error types
///
/// Every failure surfaces as a value of this enum; nothing in the public
/// API panics or throws past the crate boundary. Payloads are plain strings
/// so errors stay `Clone` and can be recorded on a facade instance.
#[derive(Debug, Clone, Error)]
pub enum AvobError {
    /// A source strategy matched but could not deliver content (unreadable
    /// file, unreachable URL).
    #[error("Source fetch error: {0}")]
    SourceFetch(String),
    /// Resolved text is not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    /// Schema reference could not be resolved or parsed into a handle.
    #[error("Schema bind error: {0}")]
    SchemaBind(String),
    /// Decoded value does not conform to the bound schema.
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),
    /// Container magic matched but the container body is corrupt.
    #[error("Binary decode error: {0}")]
    BinaryDecode(String),
    /// Byte input is neither a valid container nor valid UTF-8 text.
    #[error("Text decode error: {0}")]
    TextDecode(String),
    /// Input type is not one of bytes, text, mapping or sequence.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Binary export requested with no schema bound.
    #[error("Binary export requires a bound schema")]
    SchemaRequired,
    /// Export requested on an instance with no usable canonical value.
    #[error("Export precondition failed: {0}")]
    ExportPrecondition(String),
}

impl AvobError {
    /// Wrap a `serde_json` failure as a parse error.
    pub fn json_parse(err: &serde_json::Error) -> Self {
        AvobError::JsonParse(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AvobError>;
