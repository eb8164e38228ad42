//! Filters testing every document of an index segment for membership of a field
//! value in a very large, externally supplied term set.
//!
//! # Overview
//!
//! A [`TermsFilter`] is built from a field source, an encoded term set payload and a
//! [`CacheKey`]. The payload is decoded once, on first evaluation, into an in-memory
//! set; the encoded bytes are released at that point. Each evaluation against a
//! [`Segment`] returns a lazily consulted [`SegmentMatchSet`], or `None` when no
//! document of the segment can match.
//!
//! Two matching strategies exist:
//!
//! - **Numeric**: exact `i64` containment over integer-like storage. Numeric filters
//!   over floating-point storage never match.
//! - **Hashed bytes**: values are hashed with [`termset_codec::hash_value_with_seed`]
//!   and the digest is tested. Hash collisions may produce false positives, never
//!   false negatives.
//!
//! Result caches must key on the [`CacheKeyHandle`] exposed through
//! [`TermsFilterWeight::cache_identity`], which carries the cache key and nothing
//! else. Caller-assigned keys are trusted: two filters sharing a key are treated as
//! interchangeable regardless of their terms.

pub mod cache;
pub mod filter;
pub mod match_set;
pub mod matcher;
pub mod memory;
pub mod segment;
pub mod values;
pub mod weight;

pub use cache::{CacheIdentity, CacheKey, CacheKeyHandle};
pub use filter::{FieldKind, TermsFilter, TermsFilterOptions};
pub use match_set::{SegmentMatchIter, SegmentMatchSet};
pub use matcher::{HashedBytesMatcher, NumericMatcher};
pub use segment::{DocId, LiveDocs, Segment};
pub use values::{
    BytesDocValues, BytesFieldSource, NumericDocValues, NumericFieldSource, NumericType,
};
pub use weight::{ConstantScorer, TermsFilterWeight};
