use jobscope_common::utils::io::file::write_file;
use tracing::info;

use crate::error::Error;

/// Where a command's output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OutputTarget {
    /// A human-readable summary on stdout.
    Print,
    /// JSON on stdout.
    Json,
    /// JSON written to a file.
    File(String),
}

impl OutputTarget {
    pub(crate) fn parse(output: &str) -> Self {
        match output {
            "print" | "" => OutputTarget::Print,
            "json" => OutputTarget::Json,
            path => OutputTarget::File(path.to_string()),
        }
    }
}

/// Writes `json` to the given file, creating parent directories as needed.
pub(crate) fn write_json(path: &str, json: &str) -> Result<(), Error> {
    write_file(path, json).map_err(|e| Error::Generic(format!("failed to write output: {e}")))?;
    info!("wrote output to '{}'", path);
    Ok(())
}
