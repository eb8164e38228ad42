//! Per-segment match sets.

use termset_common::{Result, try_or_ret_some_err};

use crate::{
    matcher::SegmentMatcher,
    segment::{DocId, LiveDocs},
};

/// The documents of one segment matching a terms filter.
///
/// Matching is evaluated lazily, one document at a time, and only for live
/// documents. The set is consumed by iteration: [`SegmentMatchIter`] yields the
/// matching ids in ascending order and cannot be restarted.
pub struct SegmentMatchSet<'s> {
    max_doc: DocId,
    live_docs: Option<&'s LiveDocs>,
    matcher: SegmentMatcher,
}

impl<'s> SegmentMatchSet<'s> {
    pub(crate) fn new(
        max_doc: DocId,
        live_docs: Option<&'s LiveDocs>,
        matcher: SegmentMatcher,
    ) -> SegmentMatchSet<'s> {
        SegmentMatchSet {
            max_doc,
            live_docs,
            matcher,
        }
    }

    /// Exclusive upper bound of the document ids of the segment.
    #[inline]
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Tests a single document. Deleted documents and ids `>= max_doc` never match.
    pub fn matches(&mut self, doc: DocId) -> Result<bool> {
        if doc >= self.max_doc || !self.is_live(doc) {
            return Ok(false);
        }
        self.matcher.matches(doc)
    }

    /// Drains the set into the list of matching document ids.
    pub fn collect_docs(self) -> Result<Vec<DocId>> {
        self.into_iter().collect()
    }

    #[inline]
    fn is_live(&self, doc: DocId) -> bool {
        self.live_docs.is_none_or(|live_docs| live_docs.is_live(doc))
    }

    fn next_candidate(&self, from: DocId) -> Option<DocId> {
        if from >= self.max_doc {
            return None;
        }
        match self.live_docs {
            Some(live_docs) => live_docs.next_live(from).filter(|&doc| doc < self.max_doc),
            None => Some(from),
        }
    }
}

impl<'s> IntoIterator for SegmentMatchSet<'s> {
    type Item = Result<DocId>;
    type IntoIter = SegmentMatchIter<'s>;

    fn into_iter(self) -> SegmentMatchIter<'s> {
        SegmentMatchIter {
            set: self,
            next_doc: 0,
        }
    }
}

/// Iterator over the matching documents of a [`SegmentMatchSet`].
///
/// A doc values read error is yielded once and ends the iteration.
pub struct SegmentMatchIter<'s> {
    set: SegmentMatchSet<'s>,
    next_doc: DocId,
}

impl Iterator for SegmentMatchIter<'_> {
    type Item = Result<DocId>;

    fn next(&mut self) -> Option<Result<DocId>> {
        while let Some(doc) = self.set.next_candidate(self.next_doc) {
            self.next_doc = doc + 1;
            let matched = self.set.matcher.matches(doc);
            if matched.is_err() {
                self.next_doc = self.set.max_doc;
            }
            if try_or_ret_some_err!(matched) {
                return Some(Ok(doc));
            }
        }
        self.next_doc = self.set.max_doc;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.set.max_doc.saturating_sub(self.next_doc) as usize))
    }
}

impl std::iter::FusedIterator for SegmentMatchIter<'_> {}
