//! Cache identity of terms filters.
//!
//! A result cache (external to this crate) keys entries on a [`CacheIdentity`]. For
//! terms filters, that identity is a [`CacheKeyHandle`]: it holds the caller-assigned
//! [`CacheKey`] and no term data, so cache bookkeeping never retains or compares the
//! decoded term set.

use std::fmt;

/// Opaque, caller-assigned identity of a term set.
///
/// Filters with equal keys are interchangeable for caching purposes, whatever their
/// payloads. Assigning distinct keys to distinct term sets is the caller's
/// responsibility, and is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(i64);

impl CacheKey {
    pub const fn new(key: i64) -> CacheKey {
        CacheKey(key)
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for CacheKey {
    fn from(key: i64) -> Self {
        CacheKey(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a result cache and its caching policy see of a cacheable query.
pub trait CacheIdentity: Send + Sync + fmt::Debug + fmt::Display {
    fn cache_key(&self) -> CacheKey;

    /// Hints the caching policy that evaluation is expensive and results should be
    /// cached eagerly, rather than after repeated use.
    fn is_costly(&self) -> bool {
        false
    }

    /// Reports the terms of the query to `visitor`, e.g. for highlighting.
    fn visit_terms(&self, _visitor: &mut dyn FnMut(&[u8])) {}
}

/// Payload-free stand-in for a terms filter in cache key comparisons.
///
/// Equality and hashing use the cache key only. The handle reports itself as costly,
/// since evaluating the filter it stands for is dominated by a large decode. Term
/// enumeration is intentionally not supported: the handle has no terms to report, and
/// highlighters cannot reach the filter's term set through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKeyHandle {
    cache_key: CacheKey,
}

impl CacheKeyHandle {
    pub fn new(cache_key: CacheKey) -> CacheKeyHandle {
        CacheKeyHandle { cache_key }
    }
}

impl CacheIdentity for CacheKeyHandle {
    fn cache_key(&self) -> CacheKey {
        self.cache_key
    }

    fn is_costly(&self) -> bool {
        true
    }
}

impl fmt::Display for CacheKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKeyTermsFilter:[cacheKey={}]", self.cache_key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_handle_identity_is_the_key() {
        let a = CacheKeyHandle::new(CacheKey::new(7));
        let b = CacheKeyHandle::new(7.into());
        let c = CacheKeyHandle::new(CacheKey::new(8));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set = [a, b, c].into_iter().collect::<HashSet<_>>();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_handle_is_costly_and_has_no_terms() {
        let handle = CacheKeyHandle::new(CacheKey::new(1));
        assert!(handle.is_costly());
        let mut visited = 0;
        handle.visit_terms(&mut |_: &[u8]| visited += 1);
        assert_eq!(visited, 0);
        assert_eq!(handle.to_string(), "CacheKeyTermsFilter:[cacheKey=1]");
    }
}
