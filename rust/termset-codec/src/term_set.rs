//! Decoded term set.

use std::fmt;

use ahash::AHashSet;

/// A set of 64-bit terms with O(1) average membership testing.
///
/// Terms are unique by value and carry no ordering. The `Debug` representation only
/// reports the cardinality: a term set can hold millions of values and must never be
/// dumped into logs.
#[derive(Clone, Default)]
pub struct TermSet {
    terms: AHashSet<i64>,
}

impl TermSet {
    /// Size in bytes accounted per term.
    pub const BYTES_PER_TERM: usize = std::mem::size_of::<i64>();

    pub fn new() -> TermSet {
        TermSet::default()
    }

    pub fn with_capacity(capacity: usize) -> TermSet {
        TermSet {
            terms: AHashSet::with_capacity(capacity),
        }
    }

    /// Adds a term, returning `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, term: i64) -> bool {
        self.terms.insert(term)
    }

    #[inline]
    pub fn contains(&self, term: i64) -> bool {
        self.terms.contains(&term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Estimated size of the terms, `len() * 8`.
    pub fn estimated_size(&self) -> usize {
        self.len() * Self::BYTES_PER_TERM
    }

    /// Returns the terms in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<i64> {
        let mut terms = self.terms.iter().copied().collect::<Vec<_>>();
        terms.sort_unstable();
        terms
    }
}

impl FromIterator<i64> for TermSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        TermSet {
            terms: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for TermSet {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for TermSet {}

impl fmt::Debug for TermSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermSet").field("len", &self.len()).finish()
    }
}
