//! The lazily decoded terms filter.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc, Mutex, OnceLock, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

use termset_codec::{BinaryTermsCodec, CodecConfig, TermSet, TermsCodec};
use termset_common::{Result, error::Error};

use crate::{
    cache::CacheKey,
    match_set::SegmentMatchSet,
    matcher::{HashedBytesMatcher, NumericMatcher, SegmentMatcher},
    segment::Segment,
    values::{BytesFieldSource, NumericFieldSource},
    weight::TermsFilterWeight,
};

/// Kind of field a filter applies to. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Integer-like storage, matched by exact value.
    Numeric,
    /// Byte-valued storage, matched by value hash.
    Bytes,
}

/// Decoding options of a [`TermsFilter`].
#[derive(Clone)]
pub struct TermsFilterOptions {
    codec: Arc<dyn TermsCodec>,
    config: CodecConfig,
}

impl Default for TermsFilterOptions {
    fn default() -> Self {
        TermsFilterOptions {
            codec: Arc::new(BinaryTermsCodec),
            config: CodecConfig::default(),
        }
    }
}

impl TermsFilterOptions {
    pub fn new() -> TermsFilterOptions {
        TermsFilterOptions::default()
    }

    /// Sets the codec decoding the payload.
    pub fn codec(mut self, codec: Arc<dyn TermsCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the codec configuration (hash seed, admission limit).
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }
}

enum FieldSource {
    Numeric(Arc<dyn NumericFieldSource>),
    Bytes(Arc<dyn BytesFieldSource>),
}

impl FieldSource {
    fn field_name(&self) -> &str {
        match self {
            FieldSource::Numeric(source) => source.field_name(),
            FieldSource::Bytes(source) => source.field_name(),
        }
    }
}

/// Outcome of the single decode. A failure keeps its message and is not retried.
type DecodeOutcome = std::result::Result<Arc<TermSet>, String>;

/// Disjunctive filter over a very large set of terms.
///
/// The encoded payload is kept until the first [`evaluate`](Self::evaluate) call,
/// which decodes it exactly once (even under concurrent evaluation), releases the
/// payload, and keeps the decoded set for the lifetime of the filter.
///
/// Equality and hashing use the field kind and the cache key only, never the terms.
/// `Debug` and `Display` report the size of the term set, never its values.
pub struct TermsFilter {
    source: FieldSource,
    cache_key: CacheKey,
    options: TermsFilterOptions,
    /// The encoded payload, `None` once released. Held only while decoding.
    payload: Mutex<Option<Vec<u8>>>,
    encoded_len: AtomicUsize,
    decoded: OnceLock<DecodeOutcome>,
}

impl TermsFilter {
    /// Shallow size of a filter, accounted on top of its decoded terms.
    pub const BASE_RAM_BYTES_USED: usize = std::mem::size_of::<TermsFilter>();

    /// Creates a filter on an integer-like numeric field. An absent or empty payload
    /// means no terms.
    pub fn new_numeric(
        payload: Option<Vec<u8>>,
        source: Arc<dyn NumericFieldSource>,
        cache_key: CacheKey,
    ) -> TermsFilter {
        Self::new(
            FieldSource::Numeric(source),
            payload,
            cache_key,
            TermsFilterOptions::default(),
        )
    }

    /// Creates a filter on a byte-valued field, whose payload holds value hashes.
    pub fn new_bytes(
        payload: Option<Vec<u8>>,
        source: Arc<dyn BytesFieldSource>,
        cache_key: CacheKey,
    ) -> TermsFilter {
        Self::new(
            FieldSource::Bytes(source),
            payload,
            cache_key,
            TermsFilterOptions::default(),
        )
    }

    pub fn new_numeric_with_options(
        payload: Option<Vec<u8>>,
        source: Arc<dyn NumericFieldSource>,
        cache_key: CacheKey,
        options: TermsFilterOptions,
    ) -> Result<TermsFilter> {
        options.config.validate()?;
        Ok(Self::new(
            FieldSource::Numeric(source),
            payload,
            cache_key,
            options,
        ))
    }

    pub fn new_bytes_with_options(
        payload: Option<Vec<u8>>,
        source: Arc<dyn BytesFieldSource>,
        cache_key: CacheKey,
        options: TermsFilterOptions,
    ) -> Result<TermsFilter> {
        options.config.validate()?;
        Ok(Self::new(
            FieldSource::Bytes(source),
            payload,
            cache_key,
            options,
        ))
    }

    fn new(
        source: FieldSource,
        payload: Option<Vec<u8>>,
        cache_key: CacheKey,
        options: TermsFilterOptions,
    ) -> TermsFilter {
        // Nothing to decode: the codec is never consulted.
        let payload = payload.filter(|payload| !payload.is_empty());
        let decoded = match payload {
            Some(_) => OnceLock::new(),
            None => OnceLock::from(Ok(Arc::new(TermSet::new()))),
        };
        TermsFilter {
            source,
            cache_key,
            options,
            encoded_len: AtomicUsize::new(payload.as_ref().map_or(0, Vec::len)),
            payload: Mutex::new(payload),
            decoded,
        }
    }

    pub fn field_kind(&self) -> FieldKind {
        match self.source {
            FieldSource::Numeric(_) => FieldKind::Numeric,
            FieldSource::Bytes(_) => FieldKind::Bytes,
        }
    }

    pub fn field_name(&self) -> &str {
        self.source.field_name()
    }

    pub fn cache_key(&self) -> CacheKey {
        self.cache_key
    }

    /// Evaluates the filter against a segment.
    ///
    /// Decodes the payload on first use. Returns `Ok(None)` when no document of the
    /// segment can match: the term set is empty, or a numeric filter is applied to
    /// floating-point storage. Decode errors and doc values errors are returned as is.
    pub fn evaluate<'s>(&self, segment: &'s dyn Segment) -> Result<Option<SegmentMatchSet<'s>>> {
        let terms = self.terms()?;
        if terms.is_empty() {
            return Ok(None);
        }

        let matcher = match &self.source {
            FieldSource::Numeric(source) => {
                if source.numeric_type().is_floating_point() {
                    return Ok(None);
                }
                SegmentMatcher::Numeric(NumericMatcher::new(terms), source.load(segment)?)
            }
            FieldSource::Bytes(source) => SegmentMatcher::HashedBytes(
                HashedBytesMatcher::new(
                    terms,
                    Arc::clone(&self.options.codec),
                    self.options.config.clone(),
                ),
                source.load(segment)?,
            ),
        };
        Ok(Some(SegmentMatchSet::new(
            segment.max_doc(),
            segment.live_docs(),
            matcher,
        )))
    }

    /// Creates the constant-score weight that routes evaluation to this filter and
    /// exposes a [`crate::CacheKeyHandle`] as its cache identity.
    pub fn create_weight(self: &Arc<Self>, boost: f32) -> TermsFilterWeight {
        TermsFilterWeight::new(Arc::clone(self), boost)
    }

    /// Returns `true` once the payload has been decoded successfully.
    pub fn is_decoded(&self) -> bool {
        matches!(self.decoded.get(), Some(Ok(_)))
    }

    /// Number of decoded terms, `None` until decoded.
    pub fn term_count(&self) -> Option<usize> {
        self.decoded_terms().map(|terms| terms.len())
    }

    /// Length of the retained encoded payload; zero once it has been released.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len.load(Ordering::Relaxed)
    }

    /// Estimated resident size: the base size plus 8 bytes per decoded term.
    ///
    /// The retained payload is not accounted; before decoding it is the caller's.
    /// Never waits on a decode in progress.
    pub fn ram_bytes_used(&self) -> usize {
        Self::BASE_RAM_BYTES_USED + self.terms_size()
    }

    /// Returns the decoded terms, decoding the payload if this is the first access.
    fn terms(&self) -> Result<Arc<TermSet>> {
        if let Some(outcome) = self.decoded.get() {
            return Self::outcome(outcome);
        }

        let mut payload = self.payload.lock().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have decoded while this one waited on the lock.
        if let Some(outcome) = self.decoded.get() {
            return Self::outcome(outcome);
        }
        let Some(bytes) = payload.as_deref() else {
            return Err(Error::decode_failed("terms payload was released before decoding"));
        };

        let start = Instant::now();
        let decoded = self.options.codec.decode(bytes, &self.options.config);
        *payload = None;
        self.encoded_len.store(0, Ordering::Relaxed);
        match decoded {
            Ok(terms) => {
                log::debug!(
                    "{}: decoded {} terms for field {} - took {} ms",
                    std::thread::current().name().unwrap_or("<unnamed>"),
                    terms.len(),
                    self.field_name(),
                    start.elapsed().as_millis()
                );
                let terms = Arc::new(terms);
                let _ = self.decoded.set(Ok(Arc::clone(&terms)));
                Ok(terms)
            }
            Err(e) => {
                log::warn!("failed to decode terms for field {}: {e}", self.field_name());
                let _ = self.decoded.set(Err(e.to_string()));
                Err(e)
            }
        }
    }

    fn outcome(outcome: &DecodeOutcome) -> Result<Arc<TermSet>> {
        match outcome {
            Ok(terms) => Ok(Arc::clone(terms)),
            Err(message) => Err(Error::decode_failed(message.clone())),
        }
    }

    fn decoded_terms(&self) -> Option<&Arc<TermSet>> {
        self.decoded.get().and_then(|outcome| outcome.as_ref().ok())
    }

    fn terms_size(&self) -> usize {
        self.decoded_terms().map_or(0, |terms| terms.estimated_size())
    }

    fn kind_name(&self) -> &'static str {
        match self.field_kind() {
            FieldKind::Numeric => "NumericTermsFilter",
            FieldKind::Bytes => "BytesTermsFilter",
        }
    }
}

impl PartialEq for TermsFilter {
    fn eq(&self, other: &Self) -> bool {
        self.field_kind() == other.field_kind() && self.cache_key == other.cache_key
    }
}

impl Eq for TermsFilter {}

impl Hash for TermsFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field_kind().hash(state);
        self.cache_key.hash(state);
    }
}

impl fmt::Display for TermsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the size of the terms: a full dump could be gigantic.
        write!(
            f,
            "{}:{}:[size={}]",
            self.kind_name(),
            self.field_name(),
            self.terms_size()
        )
    }
}

impl fmt::Debug for TermsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind_name())
            .field("field", &self.field_name())
            .field("cache_key", &self.cache_key)
            .field("size", &self.terms_size())
            .finish()
    }
}
