//! Walks a [`RecordShape`] over a buffer and produces a [`DecodedRecord`].

use bytes::Bytes;
use tracing::trace;

use crate::{
    codec::{read_blob, read_fixed_uint},
    error::Error,
    schema::{FieldType, RecordShape},
};

/// A single decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// An unsigned integer of any supported width.
    Uint(u64),
    /// A copy of a fixed-size blob.
    Blob(Bytes),
    /// Array elements in index order.
    Array(Vec<DecodedValue>),
    /// A nested record.
    Record(DecodedRecord),
}

impl DecodedValue {
    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Uint(_) => "an integer",
            DecodedValue::Blob(_) => "a blob",
            DecodedValue::Array(_) => "an array",
            DecodedValue::Record(_) => "a record",
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            DecodedValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the blob, if this is one.
    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            DecodedValue::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    /// Returns the array elements, if this is an array.
    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested record, if this is one.
    pub fn as_record(&self) -> Option<&DecodedRecord> {
        match self {
            DecodedValue::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// A fully decoded record. Fields keep the order of the shape they were decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    shape: String,
    fields: Vec<(String, DecodedValue)>,
}

impl DecodedRecord {
    /// The name of the shape this record was decoded with.
    pub fn shape_name(&self) -> &str {
        &self.shape
    }

    /// The decoded fields in shape order.
    pub fn fields(&self) -> &[(String, DecodedValue)] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    /// Looks up a field by dotted path, descending through nested records.
    ///
    /// ```
    /// use jobscope_decoder::layouts::{job_request_shape, DEFAULT_VERIFIERS_PER_AUCTION};
    /// use jobscope_decoder::decode_record;
    ///
    /// let shape = job_request_shape(DEFAULT_VERIFIERS_PER_AUCTION).unwrap();
    /// let record = decode_record(&shape, &vec![0u8; shape.size()]).unwrap();
    /// assert!(record.path("verification.merkle_root").is_some());
    /// ```
    pub fn path(&self, path: &str) -> Option<&DecodedValue> {
        let mut parts = path.split('.');
        let mut value = self.get(parts.next()?)?;
        for part in parts {
            value = value.as_record()?.get(part)?;
        }
        Some(value)
    }

    fn require(&self, name: &str) -> Result<&DecodedValue, Error> {
        self.get(name).ok_or_else(|| Error::MissingField {
            record: self.shape.clone(),
            field: name.to_string(),
        })
    }

    fn mismatch(name: &str, expected: &'static str, found: &DecodedValue) -> Error {
        Error::TypeMismatch { field: name.to_string(), expected, found: found.kind() }
    }

    /// Returns an integer field.
    pub fn uint(&self, name: &str) -> Result<u64, Error> {
        let value = self.require(name)?;
        value.as_uint().ok_or_else(|| Self::mismatch(name, "an integer", value))
    }

    /// Returns an integer field converted to a narrower type, failing with
    /// [`Error::ValueOutOfRange`] if it does not fit.
    pub fn uint_as<T: TryFrom<u64>>(&self, name: &str) -> Result<T, Error> {
        let value = self.uint(name)?;
        T::try_from(value).map_err(|_| Error::ValueOutOfRange { field: name.to_string(), value })
    }

    /// Returns a blob field.
    pub fn blob(&self, name: &str) -> Result<&Bytes, Error> {
        let value = self.require(name)?;
        value.as_blob().ok_or_else(|| Self::mismatch(name, "a blob", value))
    }

    /// Returns an array field.
    pub fn array(&self, name: &str) -> Result<&[DecodedValue], Error> {
        let value = self.require(name)?;
        value.as_array().ok_or_else(|| Self::mismatch(name, "an array", value))
    }

    /// Returns a nested record field.
    pub fn record(&self, name: &str) -> Result<&DecodedRecord, Error> {
        let value = self.require(name)?;
        value.as_record().ok_or_else(|| Self::mismatch(name, "a record", value))
    }
}

/// Decodes `buffer` according to `shape`.
///
/// The buffer must hold at least `shape.size()` bytes; trailing bytes are ignored. Either the
/// whole record decodes or an error is returned, never a partial record.
pub fn decode_record(shape: &RecordShape, buffer: &[u8]) -> Result<DecodedRecord, Error> {
    if buffer.len() < shape.size() {
        return Err(Error::TruncatedBuffer { expected: shape.size(), actual: buffer.len() });
    }
    if buffer.len() > shape.size() {
        trace!(
            "ignoring {} trailing bytes after '{}'",
            buffer.len() - shape.size(),
            shape.name()
        );
    }

    decode_at(shape, buffer, 0)
}

fn decode_at(shape: &RecordShape, buffer: &[u8], base: usize) -> Result<DecodedRecord, Error> {
    let fields = shape
        .fields()
        .iter()
        .map(|field| {
            let value = decode_value(&field.ty, buffer, base + field.offset)?;
            Ok((field.name.clone(), value))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(DecodedRecord { shape: shape.name().to_string(), fields })
}

fn decode_value(ty: &FieldType, buffer: &[u8], offset: usize) -> Result<DecodedValue, Error> {
    match ty {
        FieldType::Uint(width) => read_fixed_uint(buffer, offset, *width).map(DecodedValue::Uint),
        FieldType::Blob { len, .. } => read_blob(buffer, offset, *len).map(DecodedValue::Blob),
        FieldType::Array { element, count } => {
            // the shape was composed with checked arithmetic, so this cannot overflow
            let stride = element.byte_len().unwrap_or_default();
            (0..*count)
                .map(|i| decode_value(element, buffer, offset + i * stride))
                .collect::<Result<Vec<_>, Error>>()
                .map(DecodedValue::Array)
        }
        FieldType::Record(shape) => decode_at(shape, buffer, offset).map(DecodedValue::Record),
    }
}
