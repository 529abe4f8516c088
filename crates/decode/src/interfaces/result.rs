use std::sync::Arc;

use colored::Colorize;
use serde_json::json;

use crate::{
    error::Error,
    layouts::JobRequest,
    record::DecodedRecord,
    render::{render_record, summary_lines, JOB_REQUEST_ENUMS},
    schema::RecordShape,
};

#[derive(Debug, Clone)]
/// Result of a successful decode operation
///
/// Holds both the generic record, in shape order, and its typed `JobRequest` view.
pub struct DecodeResult {
    /// The shape the account was decoded with
    pub shape: Arc<RecordShape>,
    /// The decoded record
    pub record: DecodedRecord,
    /// The typed view of the record
    pub job: JobRequest,
}

impl DecodeResult {
    /// Prints a short, coloured summary of the job request
    pub fn display(&self) {
        let lines = summary_lines(&self.job);
        let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or_default();

        for (label, value) in lines {
            println!("{}: {}", format!("{label:>width$}").bold(), value);
        }
    }

    /// Converts the decode result to JSON, including the layout size
    pub fn to_json(&self) -> Result<String, Error> {
        let result = json!({
            "layout": self.shape.name(),
            "size": self.shape.size(),
            "decoded": render_record(&self.shape, &self.record, JOB_REQUEST_ENUMS),
        });

        serde_json::to_string_pretty(&result)
            .map_err(|e| Error::Eyre(eyre::eyre!("failed to serialize to JSON: {}", e)))
    }
}
