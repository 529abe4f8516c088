//! Record shapes and their offset tables.
//!
//! A [`RecordShape`] is composed once from an ordered list of [`FieldSpec`]s. Offsets are
//! assigned in a single left-to-right pass, so the shape is pure metadata: it never looks at a
//! buffer and can be shared across any number of decode calls.

use std::sync::Arc;

use hashbrown::HashSet;

use crate::codec::UintWidth;

/// Errors raised while composing a [`RecordShape`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The shape declares no fields.
    #[error("record '{0}' declares no fields")]
    Empty(String),
    /// Two fields of the same record share a name.
    #[error("duplicate field '{field}' in record '{record}'")]
    DuplicateField {
        /// Name of the record shape.
        record: String,
        /// The duplicated field name.
        field: String,
    },
    /// A field occupies no bytes.
    #[error("field '{0}' has a zero byte length")]
    ZeroLengthField(String),
    /// The shape occupies no bytes.
    #[error("record '{0}' has a zero total size")]
    ZeroSize(String),
    /// The shape is too large to address.
    #[error("record '{0}' overflows the addressable size")]
    SizeOverflow(String),
}

/// How a fixed-size blob is meant to be read. The decoder ignores this; it exists so the
/// presentation layer can pick a textual encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    /// A 32-byte account or program identifier, rendered as base58.
    Identifier,
    /// A hash or merkle root, rendered as base64.
    Digest,
    /// NUL-padded text, such as an IPFS CID.
    Text,
    /// Anything else, rendered as hex.
    Opaque,
}

/// The type of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A little-endian unsigned integer.
    Uint(UintWidth),
    /// A fixed-size byte blob.
    Blob {
        /// Length in bytes.
        len: usize,
        /// Rendering hint.
        kind: BlobKind,
    },
    /// A fixed-length array laid out back to back.
    Array {
        /// The element type.
        element: Box<FieldType>,
        /// Number of elements.
        count: usize,
    },
    /// A nested record.
    Record(Arc<RecordShape>),
}

impl FieldType {
    /// The number of bytes a value of this type occupies, or `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            FieldType::Uint(width) => Some(width.bytes()),
            FieldType::Blob { len, .. } => Some(*len),
            FieldType::Array { element, count } => element.byte_len()?.checked_mul(*count),
            FieldType::Record(shape) => Some(shape.size()),
        }
    }

    /// A short tag naming the kind of type, e.g. `u64` or `array`.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Uint(UintWidth::U8) => "u8",
            FieldType::Uint(UintWidth::U16) => "u16",
            FieldType::Uint(UintWidth::U32) => "u32",
            FieldType::Uint(UintWidth::U64) => "u64",
            FieldType::Blob { .. } => "blob",
            FieldType::Array { .. } => "array",
            FieldType::Record(_) => "record",
        }
    }
}

/// A named field, as declared by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The field name. Must be unique within its record.
    pub name: String,
    /// The field type.
    pub ty: FieldType,
}

impl FieldSpec {
    /// Creates a new field specification.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A field with its computed position inside the enclosing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field name.
    pub name: String,
    /// The field type.
    pub ty: FieldType,
    /// Byte offset relative to the start of the enclosing record.
    pub offset: usize,
    /// Byte length of the field.
    pub len: usize,
}

/// One row of a flattened offset table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OffsetEntry {
    /// Dotted path from the root record, e.g. `verification.merkle_root`.
    pub path: String,
    /// Byte offset from the start of the root record.
    pub offset: usize,
    /// Byte length of the field.
    pub len: usize,
    /// Type tag of the field.
    pub tag: &'static str,
}

/// An ordered, immutable record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    name: String,
    fields: Vec<FieldDescriptor>,
    size: usize,
}

impl RecordShape {
    /// Composes a shape from its field specifications, computing every offset.
    ///
    /// Fails if the shape has no fields, repeats a field name, or contains a field (or totals)
    /// zero bytes.
    pub fn new(name: impl Into<String>, specs: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let name = name.into();
        if specs.is_empty() {
            return Err(SchemaError::Empty(name));
        }

        let mut seen = HashSet::with_capacity(specs.len());
        let mut fields = Vec::with_capacity(specs.len());
        let mut offset = 0usize;

        for spec in specs {
            if !seen.insert(spec.name.clone()) {
                return Err(SchemaError::DuplicateField { record: name, field: spec.name });
            }

            let len = spec.ty.byte_len().ok_or_else(|| SchemaError::SizeOverflow(name.clone()))?;
            if len == 0 {
                return Err(SchemaError::ZeroLengthField(spec.name));
            }

            fields.push(FieldDescriptor { name: spec.name, ty: spec.ty, offset, len });
            offset = offset.checked_add(len).ok_or_else(|| SchemaError::SizeOverflow(name.clone()))?;
        }

        // zero-length fields are rejected above, so this only holds the invariant
        if offset == 0 {
            return Err(SchemaError::ZeroSize(name));
        }

        Ok(Self { name, fields, size: offset })
    }

    /// Starts a [`ShapeBuilder`] for a record with the given name.
    pub fn builder(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder::new(name)
    }

    /// The record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Flattens the shape into absolute offsets. Nested records contribute a row for themselves
    /// followed by rows for each of their fields; arrays contribute a single row.
    pub fn offset_table(&self) -> Vec<OffsetEntry> {
        let mut table = Vec::new();
        self.collect_offsets("", 0, &mut table);
        table
    }

    fn collect_offsets(&self, prefix: &str, base: usize, table: &mut Vec<OffsetEntry>) {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let offset = base + field.offset;

            table.push(OffsetEntry { path: path.clone(), offset, len: field.len, tag: field.ty.tag() });
            if let FieldType::Record(shape) = &field.ty {
                shape.collect_offsets(&path, offset, table);
            }
        }
    }
}

/// A fluent builder over [`RecordShape::new`].
///
/// ```
/// use jobscope_decoder::{codec::UintWidth, schema::RecordShape};
///
/// let shape = RecordShape::builder("Pair")
///     .uint("start", UintWidth::U64)
///     .uint("end", UintWidth::U64)
///     .build()
///     .unwrap();
/// assert_eq!(shape.size(), 16);
/// assert_eq!(shape.field("end").unwrap().offset, 8);
/// ```
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    name: String,
    specs: Vec<FieldSpec>,
}

impl ShapeBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), specs: Vec::new() }
    }

    /// Appends a field of any type.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.specs.push(FieldSpec::new(name, ty));
        self
    }

    /// Appends an unsigned integer field.
    pub fn uint(self, name: impl Into<String>, width: UintWidth) -> Self {
        self.field(name, FieldType::Uint(width))
    }

    /// Appends a blob field.
    pub fn blob(self, name: impl Into<String>, len: usize, kind: BlobKind) -> Self {
        self.field(name, FieldType::Blob { len, kind })
    }

    /// Appends a 32-byte identifier.
    pub fn identifier(self, name: impl Into<String>) -> Self {
        self.blob(name, 32, BlobKind::Identifier)
    }

    /// Appends a digest blob.
    pub fn digest(self, name: impl Into<String>, len: usize) -> Self {
        self.blob(name, len, BlobKind::Digest)
    }

    /// Appends a NUL-padded text blob.
    pub fn text(self, name: impl Into<String>, len: usize) -> Self {
        self.blob(name, len, BlobKind::Text)
    }

    /// Appends a fixed-length array.
    pub fn array(self, name: impl Into<String>, element: FieldType, count: usize) -> Self {
        self.field(name, FieldType::Array { element: Box::new(element), count })
    }

    /// Appends a nested record.
    pub fn record(self, name: impl Into<String>, shape: Arc<RecordShape>) -> Self {
        self.field(name, FieldType::Record(shape))
    }

    /// Composes the shape.
    pub fn build(self) -> Result<RecordShape, SchemaError> {
        RecordShape::new(self.name, self.specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Arc<RecordShape> {
        Arc::new(
            RecordShape::builder("Pair")
                .uint("start", UintWidth::U64)
                .uint("end", UintWidth::U64)
                .build()
                .expect("valid shape"),
        )
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let shape = RecordShape::builder("Mixed")
            .uint("a", UintWidth::U8)
            .uint("b", UintWidth::U16)
            .identifier("c")
            .uint("d", UintWidth::U32)
            .build()
            .expect("valid shape");

        let offsets: Vec<_> = shape.fields().iter().map(|f| (f.offset, f.len)).collect();
        assert_eq!(offsets, vec![(0, 1), (1, 2), (3, 32), (35, 4)]);
        assert_eq!(shape.size(), 39);
    }

    #[test]
    fn test_array_and_record_lengths() {
        let shape = RecordShape::builder("Outer")
            .array("ranges", FieldType::Record(pair()), 3)
            .record("single", pair())
            .array("ids", FieldType::Blob { len: 32, kind: BlobKind::Identifier }, 2)
            .build()
            .expect("valid shape");

        assert_eq!(shape.field("ranges").unwrap().len, 48);
        assert_eq!(shape.field("single").unwrap().offset, 48);
        assert_eq!(shape.field("ids").unwrap().offset, 64);
        assert_eq!(shape.size(), 128);
    }

    #[test]
    fn test_empty_shape_rejected() {
        assert_eq!(RecordShape::new("Nothing", vec![]), Err(SchemaError::Empty("Nothing".into())));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result =
            RecordShape::builder("Dup").uint("a", UintWidth::U8).uint("a", UintWidth::U16).build();
        assert_eq!(
            result,
            Err(SchemaError::DuplicateField { record: "Dup".into(), field: "a".into() })
        );
    }

    #[test]
    fn test_zero_length_fields_rejected() {
        let blob = RecordShape::builder("Zero").blob("empty", 0, BlobKind::Opaque).build();
        assert_eq!(blob, Err(SchemaError::ZeroLengthField("empty".into())));

        let array = RecordShape::builder("Zero").array("none", FieldType::Uint(UintWidth::U8), 0).build();
        assert_eq!(array, Err(SchemaError::ZeroLengthField("none".into())));
    }

    #[test]
    fn test_size_overflow_rejected() {
        let result = RecordShape::builder("Huge")
            .array("big", FieldType::Uint(UintWidth::U64), usize::MAX)
            .build();
        assert_eq!(result, Err(SchemaError::SizeOverflow("Huge".into())));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let build = || {
            RecordShape::builder("Outer")
                .identifier("id")
                .record("inner", pair())
                .uint("tail", UintWidth::U32)
                .build()
                .expect("valid shape")
        };

        assert_eq!(build(), build());
        assert_eq!(build().offset_table(), build().offset_table());
    }

    #[test]
    fn test_offset_table_flattens_nested() {
        let shape = RecordShape::builder("Outer")
            .uint("head", UintWidth::U16)
            .record("inner", pair())
            .build()
            .expect("valid shape");

        let rows: Vec<_> =
            shape.offset_table().into_iter().map(|e| (e.path, e.offset, e.len, e.tag)).collect();
        assert_eq!(
            rows,
            vec![
                ("head".to_string(), 0, 2, "u16"),
                ("inner".to_string(), 2, 16, "record"),
                ("inner.start".to_string(), 2, 8, "u64"),
                ("inner.end".to_string(), 10, 8, "u64"),
            ]
        );
    }
}
