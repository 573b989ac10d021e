//! AVOB Format - Core primitives for the Avro object facade
//!
//! This crate provides the fundamental, I/O-free building blocks shared by
//! the rest of the workspace:
//!
//! - Container magic numbers and byte sniffing
//! - Origin and source descriptor tags
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod sniff;
pub mod source;

// Re-export commonly used types
pub use error::{AvobError, Result};
pub use sniff::{has_container_magic, is_container_prefix};
pub use source::{Origin, SourceDescriptor};
