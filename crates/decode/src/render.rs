//! Human-readable rendering of decoded records.
//!
//! Identifiers are rendered as base58, digests as base64, text blobs as NUL-trimmed UTF-8 and
//! anything else as hex. Integers listed in an enum table are rendered through their
//! [`EnumerationMap`], with unknown values kept as `unknown(<value>)`.

use base64::Engine;
use jobscope_common::utils::strings::encode_hex;
use serde_json::{json, Map, Value};

use crate::{
    enums::{EnumerationMap, JOB_REQUEST_STATUS, JOB_VERIFICATION_STATE},
    layouts::JobRequest,
    record::{DecodedRecord, DecodedValue},
    schema::{BlobKind, FieldType, RecordShape},
};

/// Enum-typed fields of a `JobRequest`, keyed by dotted path.
pub const JOB_REQUEST_ENUMS: &[(&str, EnumerationMap)] = &[
    ("status", JOB_REQUEST_STATUS),
    ("verification.verifier_states", JOB_VERIFICATION_STATE),
];

/// Encodes an identifier as base58.
pub fn to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Encodes a digest as standard base64.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Renders a blob according to its kind.
///
/// ```
/// use jobscope_decoder::{render::render_blob, schema::BlobKind};
///
/// assert_eq!(render_blob(BlobKind::Identifier, &[0u8; 32]), "11111111111111111111111111111111");
/// assert_eq!(render_blob(BlobKind::Text, b"bafy\0\0\0"), "bafy");
/// assert_eq!(render_blob(BlobKind::Opaque, &[0xde, 0xad]), "dead");
/// ```
pub fn render_blob(kind: BlobKind, bytes: &[u8]) -> String {
    match kind {
        BlobKind::Identifier => to_base58(bytes),
        BlobKind::Digest => to_base64(bytes),
        BlobKind::Text => {
            let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
            String::from_utf8_lossy(&bytes[..end]).into_owned()
        }
        BlobKind::Opaque => encode_hex(bytes),
    }
}

fn render_value(
    ty: &FieldType,
    value: &DecodedValue,
    path: &str,
    enums: &[(&str, EnumerationMap)],
) -> Value {
    match (ty, value) {
        (FieldType::Uint(_), DecodedValue::Uint(raw)) => {
            match enums.iter().find(|(p, _)| *p == path) {
                Some((_, map)) => json!(map.label(*raw).to_string()),
                None => json!(raw),
            }
        }
        (FieldType::Blob { kind, .. }, DecodedValue::Blob(bytes)) => {
            json!(render_blob(*kind, bytes))
        }
        (FieldType::Array { element, .. }, DecodedValue::Array(items)) => {
            Value::Array(items.iter().map(|item| render_value(element, item, path, enums)).collect())
        }
        (FieldType::Record(shape), DecodedValue::Record(record)) => {
            render_fields(shape, record, path, enums)
        }
        // a record always matches the shape it was decoded with
        (_, other) => json!(format!("{other:?}")),
    }
}

fn render_fields(
    shape: &RecordShape,
    record: &DecodedRecord,
    prefix: &str,
    enums: &[(&str, EnumerationMap)],
) -> Value {
    let mut object = Map::new();
    for field in shape.fields() {
        let Some(value) = record.get(&field.name) else {
            continue;
        };
        let path =
            if prefix.is_empty() { field.name.clone() } else { format!("{prefix}.{}", field.name) };
        object.insert(field.name.clone(), render_value(&field.ty, value, &path, enums));
    }
    Value::Object(object)
}

/// Renders a record decoded with `shape` into a JSON object in field order.
pub fn render_record(
    shape: &RecordShape,
    record: &DecodedRecord,
    enums: &[(&str, EnumerationMap)],
) -> Value {
    render_fields(shape, record, "", enums)
}

fn join<T, F: Fn(&T) -> String>(items: &[T], f: F) -> String {
    format!("[{}]", items.iter().map(f).collect::<Vec<_>>().join(", "))
}

/// The summary printed for a job request: label and rendered value per line.
pub fn summary_lines(job: &JobRequest) -> Vec<(&'static str, String)> {
    let verification = &job.verification;

    vec![
        ("bundle", to_base58(&job.bundle)),
        ("authority", to_base58(&job.authority)),
        ("input hash", to_base64(&job.input_hash)),
        ("output ipfs cid", render_blob(BlobKind::Text, &job.output_ipfs_cid)),
        ("max output tokens", job.max_output_tokens.to_string()),
        ("max price per output token", job.max_price_per_output_token.to_string()),
        ("output token count", job.output_token_count.to_string()),
        ("input token count", job.input_token_count.to_string()),
        ("job status", job.status.to_string()),
        ("merkle root", to_base64(&verification.merkle_root)),
        ("verified tokens", join(&verification.verified_tokens, u64::to_string)),
        ("assigned verifiers", join(&verification.assigned_verifiers, |v| to_base58(v))),
        (
            "token ranges",
            join(&verification.assigned_verifiers_token_ranges, |r| {
                format!("{}..{}", r.start, r.end)
            }),
        ),
        ("verification states", join(&verification.verifier_states, |s| s.to_string())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layouts::JOB_REQUEST_SHAPE, record::decode_record};

    fn zeroed_with_status(status: u64, verifier_state: u64) -> Vec<u8> {
        let mut buf = vec![0u8; JOB_REQUEST_SHAPE.size()];
        buf[280..288].copy_from_slice(&status.to_le_bytes());
        buf[368..376].copy_from_slice(&verifier_state.to_le_bytes());
        buf
    }

    #[test]
    fn test_render_blob_kinds() {
        assert_eq!(render_blob(BlobKind::Digest, &[0u8; 32]), "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");
        assert_eq!(render_blob(BlobKind::Identifier, &[0u8; 32]), "11111111111111111111111111111111");
        assert_eq!(render_blob(BlobKind::Text, &[0u8; 8]), "");
        assert_eq!(render_blob(BlobKind::Text, b"Qm\0x\0\0"), "Qm\0x");
    }

    #[test]
    fn test_render_record_resolves_enums() {
        let buf = zeroed_with_status(2, 1);
        let record = decode_record(&JOB_REQUEST_SHAPE, &buf).expect("should decode");
        let value = render_record(&JOB_REQUEST_SHAPE, &record, JOB_REQUEST_ENUMS);

        assert_eq!(value["status"], json!("OutputVerified"));
        assert_eq!(value["verification"]["verifier_states"], json!(["InProgress"]));
        assert_eq!(value["bundle"], json!("11111111111111111111111111111111"));
        assert_eq!(value["bump"], json!(0));
        assert_eq!(
            value["verification"]["assigned_verifiers_token_ranges"],
            json!([{ "start": 0, "end": 0 }])
        );
    }

    #[test]
    fn test_render_record_unknown_enum() {
        let buf = zeroed_with_status(99, 7);
        let record = decode_record(&JOB_REQUEST_SHAPE, &buf).expect("should decode");
        let value = render_record(&JOB_REQUEST_SHAPE, &record, JOB_REQUEST_ENUMS);

        assert_eq!(value["status"], json!("unknown(99)"));
        assert_eq!(value["verification"]["verifier_states"], json!(["unknown(7)"]));
        // the rest of the record is still rendered
        assert_eq!(value["input_token_count"], json!(0));
    }

    #[test]
    fn test_render_record_without_enums() {
        let buf = zeroed_with_status(2, 0);
        let record = decode_record(&JOB_REQUEST_SHAPE, &buf).expect("should decode");
        let value = render_record(&JOB_REQUEST_SHAPE, &record, &[]);
        assert_eq!(value["status"], json!(2));
    }

    #[test]
    fn test_summary_lines() {
        let job = JobRequest::decode(&zeroed_with_status(1, 2)).expect("should decode");
        let lines = summary_lines(&job);
        let line = |label: &str| {
            lines.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone()).expect("line exists")
        };

        assert_eq!(line("job status"), "OutputReceived");
        assert_eq!(line("verification states"), "[Completed]");
        assert_eq!(line("verified tokens"), "[0]");
        assert_eq!(line("assigned verifiers"), "[11111111111111111111111111111111]");
        assert_eq!(line("token ranges"), "[0..0]");
    }
}
