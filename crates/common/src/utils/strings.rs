use eyre::{bail, eyre, Result};
use std::fmt::Write;

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use jobscope_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(mut s: &str) -> Result<Vec<u8>> {
    // normalize
    s = s.trim().trim_start_matches("0x");

    if s.is_empty() {
        return Ok(vec![]);
    }
    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd length {}", s.len());
    }

    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| eyre!("invalid hex string: {}", s))
}

/// Encodes a slice of bytes into a lowercase hex string
///
/// ```
/// use jobscope_common::utils::strings::encode_hex;
///
/// let bytes = vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "48656c6c6f20576f726c64");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::with_capacity(s.len() * 2), |mut acc, b| {
        write!(acc, "{b:02x}").expect("unable to write");
        acc
    })
}

/// Take the first `n` characters of a string, appending `...` if it was cut.
///
/// ```
/// use jobscope_common::utils::strings::truncate;
///
/// assert_eq!(truncate("abcdef", 3), "abc...");
/// assert_eq!(truncate("abc", 3), "abc");
/// ```
pub fn truncate(s: &str, n: usize) -> String {
    match s.char_indices().nth(n) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_prefixed() {
        assert_eq!(decode_hex("0x0102ff").expect("should decode"), vec![1, 2, 255]);
    }

    #[test]
    fn test_decode_hex_empty() {
        assert!(decode_hex("0x").expect("should decode").is_empty());
    }

    #[test]
    fn test_decode_hex_odd_length() {
        assert!(decode_hex("abc").is_err());
    }

    #[test]
    fn test_decode_hex_invalid_chars() {
        assert!(decode_hex("zz").is_err());
    }

    #[test]
    fn test_encode_hex_roundtrip() {
        let bytes = vec![0u8, 16, 255];
        assert_eq!(decode_hex(&encode_hex(&bytes)).expect("should decode"), bytes);
    }
}
