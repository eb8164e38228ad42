//! Hashing of byte values into the 64-bit term space.

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::TERMSET_HASH_SEED;

/// Hashes a byte value with the default seed.
#[inline]
pub fn hash_value(value: &[u8]) -> i64 {
    hash_value_with_seed(value, TERMSET_HASH_SEED)
}

/// Hashes a byte value with XXH3-64, reinterpreting the digest as a signed term.
#[inline]
pub fn hash_value_with_seed(value: &[u8], seed: u64) -> i64 {
    xxh3_64_with_seed(value, seed) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_value(b"alice"), hash_value(b"alice"));
        assert_ne!(hash_value(b"alice"), hash_value(b"bob"));
    }

    #[test]
    fn test_seed_changes_digest() {
        assert_ne!(
            hash_value_with_seed(b"alice", 1),
            hash_value_with_seed(b"alice", 2)
        );
        assert_eq!(
            hash_value(b""),
            hash_value_with_seed(b"", TERMSET_HASH_SEED)
        );
    }
}
