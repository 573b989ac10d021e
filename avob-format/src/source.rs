//! Origin and source descriptor tags

use std::path::PathBuf;

/// Input pathway that produced a canonical value.
///
/// Set once at construction and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Caller passed an already-structured value.
    Native,
    /// Caller passed literal JSON text.
    JsonText,
    /// Caller passed Avro container bytes.
    Binary,
    /// Text was read from a local file.
    File,
    /// Text was fetched from a URL.
    Url,
}

/// Which resolver strategy produced a piece of content.
///
/// Only used while a source reference is being resolved; never persisted on
/// the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// The source string itself was the content.
    LiteralText,
    /// Content was read from this file.
    FilePath(PathBuf),
    /// Content was fetched from this URL.
    Url(String),
    /// Content came from a caller-registered strategy.
    Custom(String),
}

impl SourceDescriptor {
    /// Map the descriptor onto the origin recorded by the facade.
    pub fn origin(&self) -> Origin {
        match self {
            SourceDescriptor::LiteralText => Origin::JsonText,
            SourceDescriptor::FilePath(_) => Origin::File,
            SourceDescriptor::Url(_) => Origin::Url,
            SourceDescriptor::Custom(_) => Origin::JsonText,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_to_origin() {
        assert_eq!(SourceDescriptor::LiteralText.origin(), Origin::JsonText);
        assert_eq!(
            SourceDescriptor::FilePath(PathBuf::from("/tmp/x.json")).origin(),
            Origin::File
        );
        assert_eq!(
            SourceDescriptor::Url("http://example.com/x.json".to_string()).origin(),
            Origin::Url
        );
        assert_eq!(
            SourceDescriptor::Custom("memory".to_string()).origin(),
            Origin::JsonText
        );
    }
}
