//! In-memory segments and fields.
//!
//! Field values are held per segment ordinal, one `Vec` of values per document.
//! Documents beyond the provided values have no value.

use std::sync::Arc;

use termset_common::{Result, error::Error};

use crate::{
    segment::{DocId, LiveDocs, Segment},
    values::{
        BytesDocValues, BytesFieldSource, NumericDocValues, NumericFieldSource, NumericType,
    },
};

/// A segment held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySegment {
    ord: usize,
    max_doc: DocId,
    live_docs: Option<LiveDocs>,
}

impl InMemorySegment {
    pub fn new(ord: usize, max_doc: DocId) -> InMemorySegment {
        InMemorySegment {
            ord,
            max_doc,
            live_docs: None,
        }
    }

    /// Marks `docs` as deleted. Ids at or past `max_doc` are ignored.
    pub fn with_deleted(mut self, docs: impl IntoIterator<Item = DocId>) -> InMemorySegment {
        let live_docs = match self.live_docs.take() {
            Some(mut live_docs) => {
                for doc in docs.into_iter().filter(|&doc| doc < self.max_doc) {
                    live_docs.delete(doc);
                }
                live_docs
            }
            None => LiveDocs::from_deleted(self.max_doc, docs),
        };
        self.live_docs = Some(live_docs);
        self
    }
}

impl Segment for InMemorySegment {
    fn ord(&self) -> usize {
        self.ord
    }

    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn live_docs(&self) -> Option<&LiveDocs> {
        self.live_docs.as_ref()
    }
}

/// Numeric field values of every segment.
pub struct InMemoryNumericField {
    name: String,
    numeric_type: NumericType,
    segments: Vec<Arc<[Vec<i64>]>>,
}

impl InMemoryNumericField {
    pub fn new(name: impl Into<String>, numeric_type: NumericType) -> InMemoryNumericField {
        InMemoryNumericField {
            name: name.into(),
            numeric_type,
            segments: Vec::new(),
        }
    }

    /// Appends the values of the next segment, indexed by document id.
    pub fn with_segment(mut self, docs: Vec<Vec<i64>>) -> InMemoryNumericField {
        self.segments.push(docs.into());
        self
    }
}

impl NumericFieldSource for InMemoryNumericField {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn numeric_type(&self) -> NumericType {
        self.numeric_type
    }

    fn load(&self, segment: &dyn Segment) -> Result<Box<dyn NumericDocValues>> {
        let docs = segment_values(&self.segments, &self.name, segment)?;
        Ok(Box::new(InMemoryDocValues { docs, current: None }))
    }
}

/// Byte field values of every segment.
pub struct InMemoryBytesField {
    name: String,
    segments: Vec<Arc<[Vec<Vec<u8>>]>>,
}

impl InMemoryBytesField {
    pub fn new(name: impl Into<String>) -> InMemoryBytesField {
        InMemoryBytesField {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    /// Appends the values of the next segment, indexed by document id.
    pub fn with_segment<I, D, V>(mut self, docs: I) -> InMemoryBytesField
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let docs = docs
            .into_iter()
            .map(|values| values.into_iter().map(|v| v.as_ref().to_vec()).collect())
            .collect::<Vec<Vec<Vec<u8>>>>();
        self.segments.push(docs.into());
        self
    }
}

impl BytesFieldSource for InMemoryBytesField {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn load(&self, segment: &dyn Segment) -> Result<Box<dyn BytesDocValues>> {
        let docs = segment_values(&self.segments, &self.name, segment)?;
        Ok(Box::new(InMemoryDocValues { docs, current: None }))
    }
}

fn segment_values<T: ?Sized>(
    segments: &[Arc<T>],
    field: &str,
    segment: &dyn Segment,
) -> Result<Arc<T>> {
    segments.get(segment.ord()).cloned().ok_or_else(|| {
        Error::invalid_arg(
            "segment",
            format!("field {field} has no values for segment {}", segment.ord()),
        )
    })
}

struct InMemoryDocValues<V> {
    docs: Arc<[Vec<V>]>,
    current: Option<usize>,
}

impl<V> InMemoryDocValues<V> {
    fn advance_to(&mut self, doc: DocId) {
        self.current = Some(doc as usize).filter(|&doc| doc < self.docs.len());
    }

    fn current(&self) -> &[V] {
        self.current.map_or(&[][..], |doc| self.docs[doc].as_slice())
    }
}

impl NumericDocValues for InMemoryDocValues<i64> {
    fn advance(&mut self, doc: DocId) -> Result<()> {
        self.advance_to(doc);
        Ok(())
    }

    fn count(&self) -> usize {
        self.current().len()
    }

    fn value_at(&self, index: usize) -> i64 {
        self.current()[index]
    }
}

impl BytesDocValues for InMemoryDocValues<Vec<u8>> {
    fn advance(&mut self, doc: DocId) -> Result<()> {
        self.advance_to(doc);
        Ok(())
    }

    fn count(&self) -> usize {
        self.current().len()
    }

    fn value_at(&self, index: usize) -> &[u8] {
        &self.current()[index]
    }
}
