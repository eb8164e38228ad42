//! Pluggable codec seam used by the filters.

use termset_common::Result;

use crate::{
    config::CodecConfig, decoder::decode_with_config, hash::hash_value_with_seed,
    term_set::TermSet,
};

/// Decodes term set payloads and hashes byte values into the term space.
///
/// Implementations must be deterministic: the same payload always yields the same
/// logical set, and the same value always hashes to the same term. `hash` must agree
/// with whatever hashed the terms of byte-valued payloads.
pub trait TermsCodec: Send + Sync + 'static {
    fn decode(&self, payload: &[u8], config: &CodecConfig) -> Result<TermSet>;

    #[inline]
    fn hash(&self, value: &[u8], config: &CodecConfig) -> i64 {
        hash_value_with_seed(value, config.hash_seed)
    }
}

/// The stateless codec for the payload format produced by [`crate::encode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryTermsCodec;

impl TermsCodec for BinaryTermsCodec {
    fn decode(&self, payload: &[u8], config: &CodecConfig) -> Result<TermSet> {
        decode_with_config(payload, config)
    }
}
