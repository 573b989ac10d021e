//! Property-based tests for AVOB format primitives

use avob_format::constants::{CONTAINER_MAGIC, CONTAINER_MAGIC_PREFIX};
use avob_format::{has_container_magic, is_container_prefix};
use proptest::prelude::*;

proptest! {
    #[test]
    fn arbitrary_bytes_without_magic_never_sniff_as_container(
        bytes in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        prop_assume!(bytes.len() < 4 || bytes[..4] != CONTAINER_MAGIC);
        prop_assert!(!has_container_magic(&bytes));
        prop_assert!(!is_container_prefix(&bytes));
    }

    #[test]
    fn strict_prefix_implies_magic(tail in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut bytes = CONTAINER_MAGIC_PREFIX.to_vec();
        bytes.extend_from_slice(&tail);
        prop_assert!(is_container_prefix(&bytes));
        prop_assert!(has_container_magic(&bytes));
    }

    #[test]
    fn json_object_text_never_sniffs_as_container(
        key in "[a-zA-Z][a-zA-Z0-9_]{0,12}",
        value in any::<i64>()
    ) {
        let text = format!("{{\"{}\":{}}}", key, value);
        prop_assert!(!has_container_magic(text.as_bytes()));
        prop_assert!(!is_container_prefix(text.as_bytes()));
    }
}
