//! Term set codec: decoding of the opaque term set payload and hashing of byte
//! values into the 64-bit term space.
//!
//! A payload decodes into a [`TermSet`] of `i64` values. For numeric fields these are
//! the literal field values; for byte-valued fields they are [`hash_value`] digests of
//! the field's byte values. Hash collisions are an accepted false-positive risk.
//!
//! # Modules
//!
//! - [`config`]: codec configuration (hash seed, admission limit)
//! - [`decoder`]: payload validation and decoding
//! - [`encoder`]: payload production, the counterpart of [`decoder`]
//! - [`hash`]: XXH3-64 hashing of byte values

pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod hash;
pub mod term_set;

mod format;
mod varint;

pub use codec::{BinaryTermsCodec, TermsCodec};
pub use config::{CodecConfig, DEFAULT_MAX_TERM_COUNT, TERMSET_HASH_SEED};
pub use decoder::{decode, decode_with_config};
pub use encoder::{TermsEncoding, encode, encode_hashed};
pub use hash::{hash_value, hash_value_with_seed};
pub use term_set::TermSet;
