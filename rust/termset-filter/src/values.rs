//! Per-segment document value access.
//!
//! The storage engine owns field values; filters only consume them through the
//! traits below. A field source produces one doc values cursor per segment, and the
//! cursor is positioned on a document with `advance` before its values are read.
//! Read failures are reported by `load` and `advance` and propagated unchanged.

use termset_common::Result;

use crate::segment::{DocId, Segment};

/// Physical type of a numeric field's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt64,
    DateTime,
    Float32,
    Float64,
}

impl NumericType {
    #[inline]
    pub fn is_floating_point(&self) -> bool {
        matches!(self, NumericType::Float32 | NumericType::Float64)
    }
}

/// Cursor over the numeric values of a field within one segment.
pub trait NumericDocValues: Send {
    /// Positions the cursor on `doc`.
    fn advance(&mut self, doc: DocId) -> Result<()>;

    /// Number of values of the current document.
    fn count(&self) -> usize;

    /// Value at `index` of the current document, `index < count()`. Values of
    /// integer-like storage are reported sign-extended to `i64`.
    fn value_at(&self, index: usize) -> i64;
}

/// Cursor over the byte values of a field within one segment.
pub trait BytesDocValues: Send {
    /// Positions the cursor on `doc`.
    fn advance(&mut self, doc: DocId) -> Result<()>;

    /// Number of values of the current document.
    fn count(&self) -> usize;

    /// Value at `index` of the current document, `index < count()`.
    fn value_at(&self, index: usize) -> &[u8];
}

/// Numeric field, loadable per segment.
pub trait NumericFieldSource: Send + Sync {
    fn field_name(&self) -> &str;

    fn numeric_type(&self) -> NumericType;

    fn load(&self, segment: &dyn Segment) -> Result<Box<dyn NumericDocValues>>;
}

/// Byte-valued (string, binary, ...) field, loadable per segment.
pub trait BytesFieldSource: Send + Sync {
    fn field_name(&self) -> &str;

    fn load(&self, segment: &dyn Segment) -> Result<Box<dyn BytesDocValues>>;
}
