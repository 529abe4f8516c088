use clap::{Parser, ValueEnum};
use derive_builder::Builder;

use crate::{error::Error, utils::resolve_target};

/// How the decode target is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum InputEncoding {
    /// Detect the encoding from the target itself.
    #[default]
    Auto,
    /// A hex string, with or without a `0x` prefix.
    Hex,
    /// A base64 string, as returned by `getAccountInfo`.
    Base64,
    /// A path to a file holding the raw account bytes.
    File,
}

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Decodes raw JobRequest account data into readable fields",
    after_help = "Account data can be passed as hex, base64, or a path to a raw dump.",
    override_usage = "jobscope decode <TARGET> [OPTIONS]"
)]
/// Arguments for the decode operation
///
/// This struct contains everything needed to turn a snapshot of a `JobRequest` account into a
/// decoded record.
pub struct DecodeArgs {
    /// The account data to decode: a hex string, a base64 string, or a file path.
    #[clap(required = true)]
    pub target: String,

    /// How the target is encoded.
    #[clap(long, short, value_enum, default_value_t = InputEncoding::Auto)]
    pub encoding: InputEncoding,

    /// The number of verifiers assigned per job. Falls back to the configuration when unset.
    #[clap(long = "verifiers", value_name = "COUNT")]
    pub verifiers: Option<usize>,

    /// Where to write the output: 'print' for a summary, 'json' for JSON on stdout, or a file
    /// path for JSON on disk. Falls back to the configuration when unset. Console logs move to
    /// stderr while JSON is printed.
    #[clap(long = "output", short = 'o')]
    pub output: Option<String>,
}

impl DecodeArgs {
    /// Resolves the target into the raw account bytes. `expected_len` is the size of the
    /// record being decoded and settles input that is valid as both hex and base64.
    pub fn get_account_data(&self, expected_len: usize) -> Result<Vec<u8>, Error> {
        resolve_target(&self.target, self.encoding, expected_len)
    }
}

impl DecodeArgsBuilder {
    /// Creates a new DecodeArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            encoding: Some(InputEncoding::Auto),
            verifiers: Some(None),
            output: Some(None),
        }
    }
}
