//! Constants and magic numbers for the Avro object container format

/// Container file magic bytes: "Obj" + version 0x01
pub const CONTAINER_MAGIC: [u8; 4] = [0x4F, 0x62, 0x6A, 0x01]; // "Obj\x01"

/// Fixed prefix of a container whose metadata map holds two entries with
/// `avro.codec` serialized first: magic, zigzag map count 2 (0x04), zigzag
/// string length 10 (0x14), then the key text itself.
pub const CONTAINER_MAGIC_PREFIX: [u8; 16] = [
    0x4F, 0x62, 0x6A, 0x01, // "Obj\x01"
    0x04, 0x14, // map count 2, key length 10
    b'a', b'v', b'r', b'o', b'.', b'c', b'o', b'd', b'e', b'c',
];

/// Metadata key under which the container stores its schema as JSON text.
pub const META_SCHEMA_KEY: &str = "avro.schema";

/// Metadata key under which the container stores its compression codec.
pub const META_CODEC_KEY: &str = "avro.codec";

/// Length of the sync marker separating container data blocks.
pub const SYNC_MARKER_LEN: usize = 16;
