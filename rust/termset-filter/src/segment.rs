//! Index segments, as seen by the filters.

/// Document id, local to a segment: `0..max_doc`.
pub type DocId = u32;

/// An immutable slice of the index, evaluated independently of other segments.
pub trait Segment: Send + Sync {
    /// Ordinal of the segment within its index.
    fn ord(&self) -> usize;

    /// Exclusive upper bound of the segment's document ids.
    fn max_doc(&self) -> DocId;

    /// Liveness mask of the segment, `None` when no document is deleted.
    fn live_docs(&self) -> Option<&LiveDocs>;
}

/// Fixed-size liveness mask over `0..len` documents: a set bit marks a live document.
///
/// Bits are stored LSB-first in `u64` words; bits beyond `len` in the final word are
/// always zero.
#[derive(Clone, PartialEq, Eq)]
pub struct LiveDocs {
    len: usize,
    words: Vec<u64>,
}

impl LiveDocs {
    /// Creates a mask where every document is live.
    pub fn all_live(max_doc: DocId) -> LiveDocs {
        let len = max_doc as usize;
        let mut words = vec![u64::MAX; len.div_ceil(64)];
        Self::mask_tail(&mut words, len);
        LiveDocs { len, words }
    }

    /// Creates a mask with the given documents deleted. Ids `>= max_doc` are ignored.
    pub fn from_deleted(max_doc: DocId, deleted: impl IntoIterator<Item = DocId>) -> LiveDocs {
        let mut live_docs = Self::all_live(max_doc);
        for doc in deleted {
            if (doc as usize) < live_docs.len {
                live_docs.delete(doc);
            }
        }
        live_docs
    }

    /// Number of documents covered by the mask.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `doc` is live. Ids outside the mask are never live.
    #[inline]
    pub fn is_live(&self, doc: DocId) -> bool {
        let doc = doc as usize;
        doc < self.len && (self.words[doc / 64] >> (doc % 64)) & 1 != 0
    }

    /// Marks `doc` as deleted.
    ///
    /// Panics: if `doc >= len()`.
    #[inline]
    pub fn delete(&mut self, doc: DocId) {
        let doc = doc as usize;
        assert!(doc < self.len, "doc {doc} out of bounds {}", self.len);
        self.words[doc / 64] &= !(1u64 << (doc % 64));
    }

    pub fn num_live(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn num_deleted(&self) -> usize {
        self.len - self.num_live()
    }

    /// Returns the first live document `>= from`, if any.
    ///
    /// Skips a fully deleted stretch of 64 documents per word visited.
    pub fn next_live(&self, from: DocId) -> Option<DocId> {
        let from = from as usize;
        if from >= self.len {
            return None;
        }
        let mut word_idx = from / 64;
        let mut word = self.words[word_idx] & (u64::MAX << (from % 64));
        loop {
            if word != 0 {
                return Some((word_idx * 64 + word.trailing_zeros() as usize) as DocId);
            }
            word_idx += 1;
            if word_idx == self.words.len() {
                return None;
            }
            word = self.words[word_idx];
        }
    }

    fn mask_tail(words: &mut [u64], len: usize) {
        let rem = len % 64;
        if rem != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

impl std::fmt::Debug for LiveDocs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveDocs")
            .field("len", &self.len)
            .field("num_live", &self.num_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_live_masks_tail() {
        let live_docs = LiveDocs::all_live(70);
        assert_eq!(live_docs.len(), 70);
        assert_eq!(live_docs.num_live(), 70);
        assert!(live_docs.is_live(69));
        assert!(!live_docs.is_live(70));
        assert!(!live_docs.is_live(1000));
    }

    #[test]
    fn test_from_deleted() {
        let live_docs = LiveDocs::from_deleted(10, [1, 3, 3, 42]);
        assert_eq!(live_docs.num_deleted(), 2);
        assert!(live_docs.is_live(0));
        assert!(!live_docs.is_live(1));
        assert!(!live_docs.is_live(3));
    }

    #[test]
    fn test_next_live_skips_deleted_words() {
        let live_docs = LiveDocs::from_deleted(200, (0..150).chain(151..199));
        assert_eq!(live_docs.next_live(0), Some(150));
        assert_eq!(live_docs.next_live(150), Some(150));
        assert_eq!(live_docs.next_live(151), Some(199));
        assert_eq!(live_docs.next_live(200), None);

        let none_live = LiveDocs::from_deleted(64, 0..64);
        assert_eq!(none_live.next_live(0), None);
    }

    #[test]
    fn test_empty_mask() {
        let live_docs = LiveDocs::all_live(0);
        assert!(live_docs.is_empty());
        assert_eq!(live_docs.next_live(0), None);
    }
}
