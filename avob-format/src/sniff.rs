//! Byte sniffing for the Avro object container format

use crate::constants::{CONTAINER_MAGIC, CONTAINER_MAGIC_PREFIX};

/// Strict container check: the input begins with the full 16-byte prefix
/// (magic, two-entry metadata map, `avro.codec` key).
pub fn is_container_prefix(bytes: &[u8]) -> bool {
    bytes.len() >= CONTAINER_MAGIC_PREFIX.len()
        && bytes[..CONTAINER_MAGIC_PREFIX.len()] == CONTAINER_MAGIC_PREFIX
}

/// Structural container check: the input begins with the 4-byte file magic.
///
/// The strict prefix assumes the writer serialized its metadata map with
/// `avro.codec` first; writers with hash-ordered metadata produce valid
/// containers that only this weaker check recognizes.
pub fn has_container_magic(bytes: &[u8]) -> bool {
    bytes.len() >= CONTAINER_MAGIC.len() && bytes[..CONTAINER_MAGIC.len()] == CONTAINER_MAGIC
}
