//! The on-chain `JobRequest` account layout and its typed view.
//!
//! Field order and widths are a wire format: reordering a field or changing a width breaks every
//! existing account.

use std::sync::Arc;

use bytes::Bytes;
use lazy_static::lazy_static;

use crate::{
    codec::UintWidth,
    enums::{JobRequestStatus, JobVerificationState},
    error::Error,
    record::{decode_record, DecodedRecord, DecodedValue},
    schema::{BlobKind, FieldType, RecordShape, SchemaError},
};

/// Length of an account identifier.
pub const PUBKEY_BYTES: usize = 32;

/// Length of the NUL-padded output IPFS CID.
pub const MAX_IPFS_CID_LENGTH: usize = 96;

/// Number of verifiers assigned to each job by the deployed program.
pub const DEFAULT_VERIFIERS_PER_AUCTION: usize = 1;

/// A 32-byte account identifier.
pub type Identifier = [u8; PUBKEY_BYTES];

lazy_static! {
    /// The `JobRequest` shape for [`DEFAULT_VERIFIERS_PER_AUCTION`], composed once per process.
    pub static ref JOB_REQUEST_SHAPE: Arc<RecordShape> = Arc::new(
        job_request_shape(DEFAULT_VERIFIERS_PER_AUCTION)
            .expect("default JobRequest layout is well formed")
    );
}

/// The `(start, end)` token range assigned to a verifier.
pub fn token_range_shape() -> Result<RecordShape, SchemaError> {
    RecordShape::builder("TokenRange")
        .uint("start", UintWidth::U64)
        .uint("end", UintWidth::U64)
        .build()
}

/// The verification state nested in every job request. Index `i` of each array describes the
/// same verifier.
pub fn verification_state_shape(verifiers: usize) -> Result<RecordShape, SchemaError> {
    let u64_ty = FieldType::Uint(UintWidth::U64);

    RecordShape::builder("VerificationState")
        .digest("merkle_root", 32)
        .array(
            "assigned_verifiers",
            FieldType::Blob { len: PUBKEY_BYTES, kind: BlobKind::Identifier },
            verifiers,
        )
        .array(
            "assigned_verifiers_token_ranges",
            FieldType::Record(Arc::new(token_range_shape()?)),
            verifiers,
        )
        .array("verifier_states", u64_ty.clone(), verifiers)
        .array("verified_tokens", u64_ty, verifiers)
        .build()
}

/// The root `JobRequest` account layout.
pub fn job_request_shape(verifiers: usize) -> Result<RecordShape, SchemaError> {
    RecordShape::builder("JobRequest")
        .identifier("bundle")
        .uint("max_price_per_output_token", UintWidth::U64)
        .uint("max_output_tokens", UintWidth::U64)
        .uint("context_length_tier", UintWidth::U64)
        .uint("expiry_duration_tier", UintWidth::U64)
        .identifier("authority")
        .digest("input_hash", PUBKEY_BYTES)
        .text("output_ipfs_cid", MAX_IPFS_CID_LENGTH)
        .digest("seed", PUBKEY_BYTES)
        .uint("bump", UintWidth::U64)
        .uint("output_token_count", UintWidth::U64)
        .uint("input_token_count", UintWidth::U64)
        .uint("status", UintWidth::U64)
        .record("verification", Arc::new(verification_state_shape(verifiers)?))
        .build()
}

fn not_identifier(field: &str, found: &DecodedValue) -> Error {
    Error::TypeMismatch { field: field.to_string(), expected: "a 32 byte blob", found: found.kind() }
}

fn identifier(value: &DecodedValue, field: &str) -> Result<Identifier, Error> {
    value
        .as_blob()
        .and_then(|blob| Identifier::try_from(&blob[..]).ok())
        .ok_or_else(|| not_identifier(field, value))
}

fn identifier_field(record: &DecodedRecord, field: &str) -> Result<Identifier, Error> {
    let blob = record.blob(field)?;
    Identifier::try_from(&blob[..]).map_err(|_| Error::TypeMismatch {
        field: field.to_string(),
        expected: "a 32 byte blob",
        found: "a blob of a different length",
    })
}

fn uints(record: &DecodedRecord, field: &str) -> Result<Vec<u64>, Error> {
    record
        .array(field)?
        .iter()
        .map(|item| {
            item.as_uint().ok_or_else(|| Error::TypeMismatch {
                field: field.to_string(),
                expected: "an integer",
                found: item.kind(),
            })
        })
        .collect()
}

/// A verifier's assigned token range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenRange {
    /// First token.
    pub start: u64,
    /// Last token.
    pub end: u64,
}

impl TryFrom<&DecodedRecord> for TokenRange {
    type Error = Error;

    fn try_from(record: &DecodedRecord) -> Result<Self, Self::Error> {
        Ok(Self { start: record.uint("start")?, end: record.uint("end")? })
    }
}

/// Typed view of the nested verification state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationState {
    /// Merkle root over the verified output.
    pub merkle_root: Identifier,
    /// The verifiers assigned to the job.
    pub assigned_verifiers: Vec<Identifier>,
    /// Token range per verifier.
    pub assigned_verifiers_token_ranges: Vec<TokenRange>,
    /// Progress per verifier.
    pub verifier_states: Vec<JobVerificationState>,
    /// Number of tokens verified per verifier.
    pub verified_tokens: Vec<u64>,
}

impl TryFrom<&DecodedRecord> for VerificationState {
    type Error = Error;

    fn try_from(record: &DecodedRecord) -> Result<Self, Self::Error> {
        let assigned_verifiers = record
            .array("assigned_verifiers")?
            .iter()
            .map(|v| identifier(v, "assigned_verifiers"))
            .collect::<Result<Vec<_>, _>>()?;

        let assigned_verifiers_token_ranges = record
            .array("assigned_verifiers_token_ranges")?
            .iter()
            .map(|v| {
                v.as_record()
                    .ok_or_else(|| Error::TypeMismatch {
                        field: "assigned_verifiers_token_ranges".to_string(),
                        expected: "a record",
                        found: v.kind(),
                    })
                    .and_then(TokenRange::try_from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            merkle_root: identifier_field(record, "merkle_root")?,
            assigned_verifiers,
            assigned_verifiers_token_ranges,
            verifier_states: uints(record, "verifier_states")?
                .into_iter()
                .map(JobVerificationState::from)
                .collect(),
            verified_tokens: uints(record, "verified_tokens")?,
        })
    }
}

/// Typed view of a `JobRequest` account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// The bundle the job belongs to.
    pub bundle: Identifier,
    /// Maximum price per output token.
    pub max_price_per_output_token: u64,
    /// Maximum number of output tokens.
    pub max_output_tokens: u64,
    /// Context length tier.
    pub context_length_tier: u64,
    /// Expiry duration tier.
    pub expiry_duration_tier: u64,
    /// The account that created the job.
    pub authority: Identifier,
    /// Hash of the job input.
    pub input_hash: Identifier,
    /// NUL-padded IPFS CID of the output.
    pub output_ipfs_cid: Bytes,
    /// PDA seed.
    pub seed: Identifier,
    /// PDA bump.
    pub bump: u64,
    /// Number of output tokens produced.
    pub output_token_count: u64,
    /// Number of input tokens consumed.
    pub input_token_count: u64,
    /// Job status.
    pub status: JobRequestStatus,
    /// Verification progress.
    pub verification: VerificationState,
}

impl JobRequest {
    /// Decodes a job request using the process-wide default shape.
    pub fn decode(buffer: &[u8]) -> Result<Self, Error> {
        Self::decode_with(&JOB_REQUEST_SHAPE, buffer)
    }

    /// Decodes a job request using an explicit shape, e.g. one built for a different verifier
    /// count.
    pub fn decode_with(shape: &RecordShape, buffer: &[u8]) -> Result<Self, Error> {
        Self::try_from(&decode_record(shape, buffer)?)
    }
}

impl TryFrom<&DecodedRecord> for JobRequest {
    type Error = Error;

    fn try_from(record: &DecodedRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            bundle: identifier_field(record, "bundle")?,
            max_price_per_output_token: record.uint("max_price_per_output_token")?,
            max_output_tokens: record.uint("max_output_tokens")?,
            context_length_tier: record.uint("context_length_tier")?,
            expiry_duration_tier: record.uint("expiry_duration_tier")?,
            authority: identifier_field(record, "authority")?,
            input_hash: identifier_field(record, "input_hash")?,
            output_ipfs_cid: record.blob("output_ipfs_cid")?.clone(),
            seed: identifier_field(record, "seed")?,
            bump: record.uint("bump")?,
            output_token_count: record.uint("output_token_count")?,
            input_token_count: record.uint("input_token_count")?,
            status: JobRequestStatus::from(record.uint("status")?),
            verification: VerificationState::try_from(record.record("verification")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_job_request_size() {
        // 288 bytes of job fields followed by 96 bytes of verification state
        assert_eq!(verification_state_shape(1).unwrap().size(), 96);
        assert_eq!(JOB_REQUEST_SHAPE.size(), 384);
    }

    #[test]
    fn test_size_is_sum_of_declared_widths() {
        let verifiers = 3;
        let verification = 32 + verifiers * (32 + 16 + 8 + 8);
        let expected = 32 + 4 * 8 + 32 + 32 + MAX_IPFS_CID_LENGTH + 32 + 4 * 8 + verification;
        assert_eq!(job_request_shape(verifiers).unwrap().size(), expected);
    }

    #[test]
    fn test_job_request_offsets() {
        let table = JOB_REQUEST_SHAPE.offset_table();
        let offset = |path: &str| {
            table.iter().find(|e| e.path == path).map(|e| e.offset).expect("field exists")
        };

        assert_eq!(offset("bundle"), 0);
        assert_eq!(offset("max_price_per_output_token"), 32);
        assert_eq!(offset("expiry_duration_tier"), 56);
        assert_eq!(offset("authority"), 64);
        assert_eq!(offset("input_hash"), 96);
        assert_eq!(offset("output_ipfs_cid"), 128);
        assert_eq!(offset("seed"), 224);
        assert_eq!(offset("bump"), 256);
        assert_eq!(offset("status"), 280);
        assert_eq!(offset("verification"), 288);
        assert_eq!(offset("verification.assigned_verifiers"), 320);
        assert_eq!(offset("verification.assigned_verifiers_token_ranges"), 352);
        assert_eq!(offset("verification.verifier_states"), 368);
        assert_eq!(offset("verification.verified_tokens"), 376);
    }

    #[test]
    fn test_zero_verifiers_rejected() {
        assert!(matches!(job_request_shape(0), Err(SchemaError::ZeroLengthField(_))));
    }

    #[test]
    fn test_decode_zeroed_job_request() {
        let job = JobRequest::decode(&[0u8; 384]).expect("should decode");

        assert_eq!(job.bundle, [0u8; 32]);
        assert_eq!(job.status, JobRequestStatus::WaitingForOutput);
        assert_eq!(job.verification.assigned_verifiers, vec![[0u8; 32]]);
        assert_eq!(job.verification.assigned_verifiers_token_ranges, vec![TokenRange::default()]);
        assert_eq!(job.verification.verifier_states, vec![JobVerificationState::NotStarted]);
        assert_eq!(job.output_ipfs_cid.len(), MAX_IPFS_CID_LENGTH);
    }

    #[test]
    fn test_typed_view_reports_found_kind() {
        let shape = RecordShape::builder("VerificationState")
            .digest("merkle_root", 32)
            .array("assigned_verifiers", FieldType::Uint(UintWidth::U64), 1)
            .build()
            .unwrap();
        let record = decode_record(&shape, &[0u8; 40]).unwrap();

        match VerificationState::try_from(&record) {
            Err(Error::TypeMismatch { field, expected, found }) => {
                assert_eq!(field, "assigned_verifiers");
                assert_eq!(expected, "a 32 byte blob");
                assert_eq!(found, "an integer");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_job_request_truncated() {
        assert!(matches!(
            JobRequest::decode(&[0u8; 383]),
            Err(Error::TruncatedBuffer { expected: 384, actual: 383 })
        ));
    }
}
