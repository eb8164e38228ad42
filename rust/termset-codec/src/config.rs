//! Codec configuration.

use termset_common::{Result, verify_arg};

/// Seed of the XXH3-64 function used to hash byte values into the term space.
///
/// Encoders and filters must agree on it, otherwise no byte value ever matches.
pub const TERMSET_HASH_SEED: u64 = 0x5465_726d_5365_7431; // "TermSet1" in hex

/// Default upper bound on the number of terms a single payload may decode into.
pub const DEFAULT_MAX_TERM_COUNT: usize = 1 << 30;

/// Configuration shared by term set encoding, decoding and value hashing.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Hash function seed for byte-valued terms.
    pub hash_seed: u64,
    /// Maximum number of terms a payload may declare. Payloads above the limit are
    /// rejected before any allocation takes place.
    pub max_term_count: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            hash_seed: TERMSET_HASH_SEED,
            max_term_count: DEFAULT_MAX_TERM_COUNT,
        }
    }
}

impl CodecConfig {
    /// Sets the admission limit on the decoded term count.
    pub fn with_max_term_count(mut self, max_term_count: usize) -> Self {
        self.max_term_count = max_term_count;
        self
    }

    /// Sets the byte value hash seed.
    pub fn with_hash_seed(mut self, hash_seed: u64) -> Self {
        self.hash_seed = hash_seed;
        self
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(max_term_count, self.max_term_count > 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CodecConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hash_seed, TERMSET_HASH_SEED);
    }

    #[test]
    fn test_zero_term_limit_is_rejected() {
        let config = CodecConfig::default().with_max_term_count(0);
        assert!(config.validate().is_err());
    }
}
