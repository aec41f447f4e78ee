//! Error types for layout validation, word access and the Courier model.

use thiserror::Error;

use crate::memory::LongPointer;

/// Errors produced when validating a [crate::record::Record] layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Bit range is reversed or reaches past bit 15.
    #[error("field `{field}` has an invalid bit range")]
    InvalidBitRange { field: String },
    /// Two sub-word fields claim the same bit of the same word.
    #[error("fields `{first}` and `{second}` overlap in word {offset}")]
    OverlappingBits {
        first: String,
        second: String,
        offset: u32,
    },
    /// A full-word or nested field shares its word with another field.
    #[error("field `{field}` shares word {offset} with another field")]
    SharedWord { field: String, offset: u32 },
    /// Field extends beyond the declared record size.
    #[error("field `{field}` lies outside the record")]
    FieldOutsideRecord { field: String },
    /// Declared size differs from the words the fields occupy.
    #[error("record `{record}` declares {declared} words but its fields span {computed}")]
    SizeMismatch {
        record: String,
        declared: u32,
        computed: u32,
    },
    /// Field name is empty.
    #[error("record `{record}` has a field with an empty name")]
    InvalidFieldName { record: String },
    /// Two fields of one record share a name.
    #[error("record `{record}` declares `{field}` more than once")]
    DuplicateField { record: String, field: String },
    /// Record contains itself, directly or through other nested records.
    #[error("record `{record}` nests itself")]
    RecursiveRecord { record: String },
}

/// Errors reported by a [crate::memory::Memory] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is beyond the end of the backing store.
    #[error("address {address:#o} is out of range")]
    OutOfBounds { address: LongPointer },
}

/// Errors produced by field and record accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    /// Value does not fit the field (only from the checked setters).
    #[error("value {value:#x} does not fit in {width} bits")]
    ValueTooWide { value: u16, width: u8 },
    /// Path does not name a member of the record.
    #[error("no field named `{0}`")]
    UnknownField(String),
    /// Path names a nested record wider than one word.
    #[error("`{0}` is a multi-word record and has no single value")]
    CompositeField(String),
}

/// Errors raised while building Courier types and constants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    /// Constant text is absent.
    #[error("value is null")]
    NullValue,
    /// String constant does not fit the 16-bit length prefix.
    #[error("Length of value is too long. length = {length}")]
    ValueTooLong { length: usize },
    /// Sequence bound does not fit the 16-bit length prefix.
    #[error("Maximum size of sequence is too large. size = {size}")]
    SequenceTooLong { size: u64 },
}
