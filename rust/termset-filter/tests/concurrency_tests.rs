use std::{
    sync::{
        Arc, Barrier, Mutex,
        atomic::{AtomicUsize, Ordering},
        mpsc::{self, Receiver},
    },
    time::{Duration, Instant},
};

use termset_codec::{BinaryTermsCodec, CodecConfig, TermSet, TermsCodec, TermsEncoding, encode};
use termset_common::Result;
use termset_filter::{
    CacheKey, DocId, NumericType, TermsFilter, TermsFilterOptions,
    memory::{InMemoryNumericField, InMemorySegment},
};

/// Counts decodes and holds the decoding thread long enough for others to pile up.
#[derive(Default)]
struct SlowCodec {
    decodes: AtomicUsize,
}

impl TermsCodec for SlowCodec {
    fn decode(&self, payload: &[u8], config: &CodecConfig) -> Result<TermSet> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        BinaryTermsCodec.decode(payload, config)
    }
}

const THREADS: usize = 8;

#[test]
fn test_concurrent_evaluation_decodes_once() {
    let mut field = InMemoryNumericField::new("user_id", NumericType::Int64);
    for seg in 0..THREADS as i64 {
        field = field.with_segment((0..100).map(|doc| vec![seg * 100 + doc]).collect());
    }
    let codec = Arc::new(SlowCodec::default());
    let filter = TermsFilter::new_numeric_with_options(
        Some(encode((0..800).step_by(3), TermsEncoding::DeltaVarint)),
        Arc::new(field),
        CacheKey::new(1),
        TermsFilterOptions::new().codec(codec.clone()),
    )
    .unwrap();

    let barrier = Barrier::new(THREADS);
    let results = std::thread::scope(|s| {
        let handles = (0..THREADS)
            .map(|ord| {
                let filter = &filter;
                let barrier = &barrier;
                s.spawn(move || {
                    let segment = InMemorySegment::new(ord, 100);
                    barrier.wait();
                    filter
                        .evaluate(&segment)
                        .unwrap()
                        .unwrap()
                        .collect_docs()
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(codec.decodes.load(Ordering::SeqCst), 1);
    assert_eq!(filter.encoded_len(), 0);
    for (ord, docs) in results.iter().enumerate() {
        let expected = (0..100u32)
            .filter(|doc| (ord as u32 * 100 + doc) % 3 == 0)
            .collect::<Vec<DocId>>();
        assert_eq!(docs, &expected);
    }
}

#[test]
fn test_concurrent_evaluation_of_shared_filter_on_one_segment() {
    let field = InMemoryNumericField::new("id", NumericType::Int32)
        .with_segment((0..1000).map(|doc| vec![doc, -doc]).collect());
    let filter = Arc::new(TermsFilter::new_numeric(
        Some(encode([-10, 20, -999], TermsEncoding::Plain)),
        Arc::new(field),
        CacheKey::new(2),
    ));
    let segment = Arc::new(InMemorySegment::new(0, 1000).with_deleted([20]));

    let handles = (0..THREADS)
        .map(|_| {
            let filter = Arc::clone(&filter);
            let segment = Arc::clone(&segment);
            std::thread::spawn(move || {
                filter
                    .evaluate(segment.as_ref())
                    .unwrap()
                    .unwrap()
                    .collect_docs()
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![10, 999]);
    }
    assert_eq!(filter.term_count(), Some(3));
}

/// Parks the decoding thread until released, after signalling that decoding started.
struct GatedCodec {
    started: Barrier,
    release: Mutex<Receiver<()>>,
}

impl TermsCodec for GatedCodec {
    fn decode(&self, payload: &[u8], config: &CodecConfig) -> Result<TermSet> {
        self.started.wait();
        let _ = self
            .release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5));
        BinaryTermsCodec.decode(payload, config)
    }
}

#[test]
fn test_size_reporting_does_not_wait_for_decode() {
    let (release, gate) = mpsc::channel();
    let codec = Arc::new(GatedCodec {
        started: Barrier::new(2),
        release: Mutex::new(gate),
    });
    let payload = encode(0..50, TermsEncoding::Plain);
    let payload_len = payload.len();
    let filter = TermsFilter::new_numeric_with_options(
        Some(payload),
        Arc::new(InMemoryNumericField::new("id", NumericType::Int64).with_segment(vec![vec![7]])),
        CacheKey::new(3),
        TermsFilterOptions::new().codec(codec.clone()),
    )
    .unwrap();

    std::thread::scope(|s| {
        let decoder = s.spawn(|| {
            filter
                .evaluate(&InMemorySegment::new(0, 1))
                .unwrap()
                .unwrap()
                .collect_docs()
                .unwrap()
        });
        codec.started.wait();

        let start = Instant::now();
        assert_eq!(filter.ram_bytes_used(), TermsFilter::BASE_RAM_BYTES_USED);
        assert_eq!(filter.to_string(), "NumericTermsFilter:id:[size=0]");
        assert!(format!("{filter:?}").contains("size: 0"));
        assert!(!filter.is_decoded());
        assert_eq!(filter.term_count(), None);
        assert_eq!(filter.encoded_len(), payload_len);
        assert!(start.elapsed() < Duration::from_secs(2));

        release.send(()).unwrap();
        assert_eq!(decoder.join().unwrap(), vec![0]);
    });

    assert_eq!(filter.term_count(), Some(50));
    assert_eq!(filter.to_string(), "NumericTermsFilter:id:[size=50]");
}
