use fancy_regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    /// Matches an even-length hex string, with or without a `0x` prefix.
    pub static ref HEX_REGEX: Regex =
        Regex::new(r"^(?:0x)?(?:[0-9a-fA-F]{2})+$").expect("failed to compile regex");

    /// Matches a standard-alphabet base64 string, padding optional.
    pub static ref BASE64_REGEX: Regex =
        Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}(?:==)?|[A-Za-z0-9+/]{3}=?)?$")
            .expect("failed to compile regex");

    /// Matches a base58 encoded 32-byte account identifier.
    pub static ref ACCOUNT_ID_REGEX: Regex =
        Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("failed to compile regex");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_regex() {
        assert!(HEX_REGEX.is_match("0x00ff").unwrap());
        assert!(HEX_REGEX.is_match("deadBEEF").unwrap());
        assert!(!HEX_REGEX.is_match("0x0").unwrap());
        assert!(!HEX_REGEX.is_match("zz").unwrap());
    }

    #[test]
    fn test_base64_regex() {
        assert!(BASE64_REGEX.is_match("AAAA").unwrap());
        assert!(BASE64_REGEX.is_match("aGVsbG8=").unwrap());
        assert!(!BASE64_REGEX.is_match("not base64!").unwrap());
    }

    #[test]
    fn test_account_id_regex() {
        assert!(ACCOUNT_ID_REGEX.is_match("11111111111111111111111111111111").unwrap());
        assert!(!ACCOUNT_ID_REGEX.is_match("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl").unwrap());
    }
}
