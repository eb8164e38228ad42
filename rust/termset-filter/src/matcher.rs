//! Document matching strategies.
//!
//! A document matches when any of its values is in the term set. The strategy is
//! picked once per segment evaluation and carried as a [`SegmentMatcher`] variant, so
//! the per-document path has no dynamic dispatch beyond the doc values cursor.

use std::sync::Arc;

use termset_codec::{BinaryTermsCodec, CodecConfig, TermSet, TermsCodec};
use termset_common::Result;

use crate::{
    segment::DocId,
    values::{BytesDocValues, NumericDocValues},
};

/// Exact `i64` containment.
#[derive(Clone)]
pub struct NumericMatcher {
    terms: Arc<TermSet>,
}

impl NumericMatcher {
    pub fn new(terms: Arc<TermSet>) -> NumericMatcher {
        NumericMatcher { terms }
    }

    /// Returns `true` if any of `values` is a term.
    #[inline]
    pub fn matches(&self, values: impl IntoIterator<Item = i64>) -> bool {
        values.into_iter().any(|value| self.terms.contains(value))
    }

    fn matches_doc(&self, values: &mut dyn NumericDocValues, doc: DocId) -> Result<bool> {
        values.advance(doc)?;
        Ok((0..values.count()).any(|i| self.terms.contains(values.value_at(i))))
    }
}

/// Hash-then-contains, for byte-valued fields.
///
/// Values are hashed by the codec that decoded the terms, with its configuration.
#[derive(Clone)]
pub struct HashedBytesMatcher {
    terms: Arc<TermSet>,
    codec: Arc<dyn TermsCodec>,
    config: CodecConfig,
}

impl HashedBytesMatcher {
    pub fn new(
        terms: Arc<TermSet>,
        codec: Arc<dyn TermsCodec>,
        config: CodecConfig,
    ) -> HashedBytesMatcher {
        HashedBytesMatcher {
            terms,
            codec,
            config,
        }
    }

    /// Matcher hashing with the default codec and `hash_seed`.
    pub fn with_seed(terms: Arc<TermSet>, hash_seed: u64) -> HashedBytesMatcher {
        Self::new(
            terms,
            Arc::new(BinaryTermsCodec),
            CodecConfig::default().with_hash_seed(hash_seed),
        )
    }

    /// Returns `true` if the hash of any of `values` is a term.
    #[inline]
    pub fn matches<'a>(&self, values: impl IntoIterator<Item = &'a [u8]>) -> bool {
        values.into_iter().any(|value| self.contains_value(value))
    }

    #[inline]
    fn contains_value(&self, value: &[u8]) -> bool {
        self.terms.contains(self.codec.hash(value, &self.config))
    }

    fn matches_doc(&self, values: &mut dyn BytesDocValues, doc: DocId) -> Result<bool> {
        values.advance(doc)?;
        Ok((0..values.count()).any(|i| self.contains_value(values.value_at(i))))
    }
}

/// A matcher bound to the doc values of one segment.
pub(crate) enum SegmentMatcher {
    Numeric(NumericMatcher, Box<dyn NumericDocValues>),
    HashedBytes(HashedBytesMatcher, Box<dyn BytesDocValues>),
}

impl SegmentMatcher {
    #[inline]
    pub(crate) fn matches(&mut self, doc: DocId) -> Result<bool> {
        match self {
            SegmentMatcher::Numeric(matcher, values) => matcher.matches_doc(values.as_mut(), doc),
            SegmentMatcher::HashedBytes(matcher, values) => {
                matcher.matches_doc(values.as_mut(), doc)
            }
        }
    }
}
