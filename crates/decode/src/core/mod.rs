use std::{sync::Arc, time::Instant};

use jobscope_common::utils::strings::truncate;
use tracing::{debug, info};

use crate::{
    error::Error,
    interfaces::{DecodeArgs, DecodeResult},
    layouts::{job_request_shape, JobRequest, DEFAULT_VERIFIERS_PER_AUCTION, JOB_REQUEST_SHAPE},
    record::decode_record,
};

/// Decodes a `JobRequest` account snapshot.
///
/// The target is resolved into bytes, the layout for the requested verifier count is composed
/// (the default layout is shared process-wide), and the buffer is decoded in a single pass.
pub fn decode(args: DecodeArgs) -> Result<DecodeResult, Error> {
    let start_time = Instant::now();

    let verifiers = args.verifiers.unwrap_or(DEFAULT_VERIFIERS_PER_AUCTION);
    let shape = if verifiers == DEFAULT_VERIFIERS_PER_AUCTION {
        Arc::clone(&JOB_REQUEST_SHAPE)
    } else {
        Arc::new(job_request_shape(verifiers)?)
    };
    debug!("using '{}' layout of {} bytes for {} verifier(s)", shape.name(), shape.size(), verifiers);

    debug!("resolving target '{}' as {:?}", truncate(&args.target, 64), args.encoding);
    let data = args.get_account_data(shape.size())?;
    debug!("resolved {} bytes of account data", data.len());

    let record = decode_record(&shape, &data)?;
    let job = JobRequest::try_from(&record)?;

    info!("decoded {} in {:?}", shape.name(), start_time.elapsed());
    Ok(DecodeResult { shape, record, job })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{enums::JobRequestStatus, interfaces::DecodeArgsBuilder};
    use base64::Engine;
    use jobscope_common::utils::strings::encode_hex;

    #[test]
    fn test_decode_hex_target() {
        let mut data = vec![0u8; 384];
        data[280] = 2;

        let args = DecodeArgsBuilder::new()
            .target(format!("0x{}", encode_hex(&data)))
            .build()
            .expect("failed to build DecodeArgs");
        let result = decode(args).expect("should decode");

        assert_eq!(result.job.status, JobRequestStatus::OutputVerified);
        assert_eq!(result.shape.size(), 384);
    }

    #[test]
    fn test_decode_custom_verifier_count() {
        let shape = job_request_shape(2).expect("valid shape");
        let data = vec![0u8; shape.size()];

        let args = DecodeArgsBuilder::new()
            .target(encode_hex(&data))
            .verifiers(Some(2))
            .build()
            .expect("failed to build DecodeArgs");
        let result = decode(args).expect("should decode");

        assert_eq!(result.job.verification.assigned_verifiers.len(), 2);
        assert_eq!(result.job.verification.verified_tokens, vec![0, 0]);
    }

    #[test]
    fn test_decode_truncated_target() {
        let args = DecodeArgsBuilder::new()
            .target(encode_hex(&[0u8; 383]))
            .build()
            .expect("failed to build DecodeArgs");

        assert!(matches!(
            decode(args),
            Err(Error::TruncatedBuffer { expected: 384, actual: 383 })
        ));
    }

    #[test]
    fn test_decode_zeroed_base64_account() {
        let target = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 384]);
        let args = DecodeArgsBuilder::new().target(target).build().expect("failed to build DecodeArgs");
        let result = decode(args).expect("should decode");

        assert_eq!(result.job.status, JobRequestStatus::WaitingForOutput);
        assert_eq!(result.job.bundle, [0u8; 32]);
    }

    #[test]
    fn test_decode_result_to_json() {
        let data = vec![0u8; 384];
        let args = DecodeArgsBuilder::new()
            .target(encode_hex(&data))
            .build()
            .expect("failed to build DecodeArgs");
        let result = decode(args).expect("should decode");

        let json: serde_json::Value =
            serde_json::from_str(&result.to_json().expect("should serialize")).expect("valid json");
        assert_eq!(json["layout"], "JobRequest");
        assert_eq!(json["size"], 384);
        assert_eq!(json["decoded"]["status"], "WaitingForOutput");
    }
}
