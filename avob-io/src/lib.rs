//! AVOB I/O - Source resolution and the canonical object facade
//!
//! This crate provides the I/O layer and the high-level API:
//!
//! - Resolver strategies turning string references into JSON text
//!   (file, URL, literal, caller-registered)
//! - Schema binding from handles, mappings and text references
//! - The `CanonicalObject` facade: format detection, validation state
//!   and memoized JSON/container exports

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::time::Duration;

pub mod binder;
mod export;
pub mod object;
pub mod resolver;

// Re-export commonly used types
pub use avob_codec::{SchemaHandle, SchemaKind};
pub use avob_format::{AvobError, Origin, Result, SourceDescriptor};
pub use binder::{SchemaBinder, SchemaRef};
pub use object::{CanonicalObject, Input};
pub use resolver::{Resolution, ResolveStrategy, ResolvedSource, ResolverRegistry};

/// Construction options for the facade.
///
/// All file and network access happens synchronously during construction;
/// the fetch deadline is the only tunable and applies to URL-sourced
/// content (data and schema references alike).
#[derive(Debug, Clone)]
pub struct ObjectOptions {
    /// Deadline for a single blocking URL fetch.
    pub fetch_timeout: Duration,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
        }
    }
}
