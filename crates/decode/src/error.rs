//! Error types for the decoder.

use crate::schema::SchemaError;

/// Errors that can occur while decoding account data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A primitive read would run past the end of the buffer. The top-level length check makes
    /// this an internal invariant violation.
    #[error("out of bounds read: {len} bytes at offset {offset} exceeds buffer of {buffer_len} bytes")]
    OutOfBounds {
        /// Offset of the attempted read.
        offset: usize,
        /// Number of bytes requested.
        len: usize,
        /// Length of the buffer being read.
        buffer_len: usize,
    },
    /// The buffer is shorter than the record shape requires.
    #[error("truncated buffer: expected at least {expected} bytes, got {actual}")]
    TruncatedBuffer {
        /// The size of the record shape.
        expected: usize,
        /// The length of the supplied buffer.
        actual: usize,
    },
    /// A decoded integer does not fit the representation requested for it.
    #[error("value {value} of field '{field}' is out of range")]
    ValueOutOfRange {
        /// The field holding the value.
        field: String,
        /// The raw decoded value.
        value: u64,
    },
    /// An integer has no label in the enumeration it is resolved against.
    #[error("unknown {map} value: {value}")]
    UnknownEnumValue {
        /// Name of the enumeration map.
        map: &'static str,
        /// The raw decoded value.
        value: u64,
    },
    /// A decoded record has no field with the requested name.
    #[error("record '{record}' has no field '{field}'")]
    MissingField {
        /// Name of the record shape.
        record: String,
        /// The requested field.
        field: String,
    },
    /// A field holds a different kind of value than requested.
    #[error("field '{field}' is {found}, not {expected}")]
    TypeMismatch {
        /// The requested field.
        field: String,
        /// The kind of value that was expected.
        expected: &'static str,
        /// The kind of value the field holds.
        found: &'static str,
    },
    /// The record shape itself is malformed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    /// The decode target could not be turned into bytes.
    #[error("input error: {0}")]
    Input(String),
    /// Internal error.
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
