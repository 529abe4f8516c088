use std::path::Path;

use base64::Engine;
use jobscope_common::{
    constants::{ACCOUNT_ID_REGEX, BASE64_REGEX, HEX_REGEX},
    utils::{io::file::read_bytes, strings::decode_hex},
};
use tracing::debug;

use crate::{error::Error, interfaces::InputEncoding};

fn from_hex(target: &str) -> Result<Vec<u8>, Error> {
    decode_hex(target).map_err(|e| Error::Input(e.to_string()))
}

fn from_base64(target: &str) -> Result<Vec<u8>, Error> {
    base64::engine::general_purpose::STANDARD
        .decode(target.trim())
        .map_err(|e| Error::Input(format!("invalid base64: {e}")))
}

fn from_file(target: &str) -> Result<Vec<u8>, Error> {
    read_bytes(target).map_err(|e| Error::Input(format!("failed to read '{target}': {e}")))
}

/// Picks between the base64 and hex readings of a target made only of hex digits, which is
/// valid in both alphabets. A reading of exactly `expected_len` bytes wins, then one long
/// enough to hold the record. Base64 is preferred on a tie since RPC snapshots use it.
fn from_ambiguous(target: &str, expected_len: usize) -> Result<Vec<u8>, Error> {
    let base64 = from_base64(target);
    let hex = from_hex(target);
    let len = |data: &Result<Vec<u8>, Error>| data.as_ref().ok().map(Vec::len);

    let use_hex = match (len(&base64), len(&hex)) {
        (Some(b), Some(h)) => {
            b != expected_len && (h == expected_len || (b < expected_len && h >= expected_len))
        }
        (None, Some(_)) => true,
        _ => false,
    };

    if use_hex {
        debug!("treating target as hex");
        hex
    } else {
        debug!("treating target as base64");
        base64
    }
}

/// Turns a decode target into raw bytes.
///
/// With [`InputEncoding::Auto`], an existing file wins, then `0x`-prefixed hex, then base64.
/// Unprefixed input that is also valid hex is read as whichever encoding yields a buffer large
/// enough for `expected_len` bytes. A bare account identifier is rejected, since fetching
/// account data is left to the caller. Account ids are at most 44 characters, far shorter than
/// any encoded account this crate decodes.
pub(crate) fn resolve_target(
    target: &str,
    encoding: InputEncoding,
    expected_len: usize,
) -> Result<Vec<u8>, Error> {
    let target = target.trim();

    match encoding {
        InputEncoding::Hex => from_hex(target),
        InputEncoding::Base64 => from_base64(target),
        InputEncoding::File => from_file(target),
        InputEncoding::Auto => {
            let is_hex = HEX_REGEX.is_match(target).unwrap_or(false);

            if Path::new(target).is_file() {
                debug!("treating target as a file path");
                from_file(target)
            } else if is_hex && target.starts_with("0x") {
                debug!("treating target as hex");
                from_hex(target)
            } else if ACCOUNT_ID_REGEX.is_match(target).unwrap_or(false) {
                Err(Error::Input(format!(
                    "'{target}' looks like an account id; pass the account data instead"
                )))
            } else if is_hex {
                from_ambiguous(target, expected_len)
            } else if BASE64_REGEX.is_match(target).unwrap_or(false) {
                debug!("treating target as base64");
                from_base64(target)
            } else {
                Err(Error::Input(format!("unable to detect the encoding of '{target}'")))
            }
        }
    }
}
