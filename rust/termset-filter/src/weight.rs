//! Constant-score weight of a terms filter.

use std::sync::Arc;

use termset_common::{Result, try_or_ret_some_err};

use crate::{
    cache::{CacheIdentity, CacheKeyHandle},
    filter::TermsFilter,
    match_set::{SegmentMatchIter, SegmentMatchSet},
    segment::{DocId, Segment},
};

/// Evaluation handle of a [`TermsFilter`] within a query execution.
///
/// The weight splits the filter's two roles: segment evaluation is routed to the
/// filter itself, while cache bookkeeping only sees [`Self::cache_identity`], a
/// [`CacheKeyHandle`] that never references the term set. All matching documents get
/// the same score, the boost of the weight.
pub struct TermsFilterWeight {
    filter: Arc<TermsFilter>,
    identity: CacheKeyHandle,
    boost: f32,
}

impl TermsFilterWeight {
    pub fn new(filter: Arc<TermsFilter>, boost: f32) -> TermsFilterWeight {
        let identity = CacheKeyHandle::new(filter.cache_key());
        TermsFilterWeight {
            filter,
            identity,
            boost,
        }
    }

    pub fn filter(&self) -> &Arc<TermsFilter> {
        &self.filter
    }

    /// Identity to use as result cache key.
    pub fn cache_identity(&self) -> &CacheKeyHandle {
        &self.identity
    }

    /// Score of every matching document.
    #[inline]
    pub fn score(&self) -> f32 {
        self.boost
    }

    /// Never reports any term: term sets handled by this filter are too large to be
    /// enumerated by highlighters and similar consumers.
    pub fn visit_terms(&self, visitor: &mut dyn FnMut(&[u8])) {
        self.identity.visit_terms(visitor);
    }

    /// Evaluates the filter against `segment`; see [`TermsFilter::evaluate`].
    pub fn match_set<'s>(&self, segment: &'s dyn Segment) -> Result<Option<SegmentMatchSet<'s>>> {
        self.filter.evaluate(segment)
    }

    /// Returns a scorer over the matching documents of `segment`, or `None` when no
    /// document can match.
    pub fn scorer<'s>(&self, segment: &'s dyn Segment) -> Result<Option<ConstantScorer<'s>>> {
        Ok(self.match_set(segment)?.map(|set| ConstantScorer {
            docs: set.into_iter(),
            score: self.score(),
        }))
    }
}

/// Yields `(doc, score)` for every matching document of a segment, with a constant
/// score.
pub struct ConstantScorer<'s> {
    docs: SegmentMatchIter<'s>,
    score: f32,
}

impl ConstantScorer<'_> {
    pub fn score(&self) -> f32 {
        self.score
    }
}

impl Iterator for ConstantScorer<'_> {
    type Item = Result<(DocId, f32)>;

    fn next(&mut self) -> Option<Self::Item> {
        let doc = try_or_ret_some_err!(self.docs.next()?);
        Some(Ok((doc, self.score)))
    }
}
