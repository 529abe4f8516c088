//! Closed enumerations stored on-chain as plain integers.
//!
//! Resolution never falls back to a default label: an integer outside the map is kept and
//! rendered as `unknown(<value>)`.

use std::fmt;

use crate::error::Error;

/// Maps the integers `0..labels.len()` to labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationMap {
    /// The enumeration name, used in error messages.
    pub name: &'static str,
    /// Labels indexed by their integer value.
    pub labels: &'static [&'static str],
}

/// The status of a job request.
pub const JOB_REQUEST_STATUS: EnumerationMap = EnumerationMap {
    name: "JobRequestStatus",
    labels: &["WaitingForOutput", "OutputReceived", "OutputVerified"],
};

/// The state of a single verifier's work on a job.
pub const JOB_VERIFICATION_STATE: EnumerationMap = EnumerationMap {
    name: "JobVerificationState",
    labels: &["NotStarted", "InProgress", "Completed"],
};

impl EnumerationMap {
    /// Resolves `value` to its label, failing with [`Error::UnknownEnumValue`].
    ///
    /// ```
    /// use jobscope_decoder::enums::JOB_REQUEST_STATUS;
    ///
    /// assert_eq!(JOB_REQUEST_STATUS.resolve(1).unwrap(), "OutputReceived");
    /// assert!(JOB_REQUEST_STATUS.resolve(99).is_err());
    /// ```
    pub fn resolve(&self, value: u64) -> Result<&'static str, Error> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| self.labels.get(idx).copied())
            .ok_or(Error::UnknownEnumValue { map: self.name, value })
    }

    /// Resolves `value` without failing.
    pub fn label(&self, value: u64) -> EnumLabel {
        match self.resolve(value) {
            Ok(label) => EnumLabel::Known(label),
            Err(_) => EnumLabel::Unknown(value),
        }
    }
}

/// The result of resolving an integer against an [`EnumerationMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumLabel {
    /// The value has a label.
    Known(&'static str),
    /// The value is outside the map.
    Unknown(u64),
}

impl fmt::Display for EnumLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumLabel::Known(label) => write!(f, "{label}"),
            EnumLabel::Unknown(value) => write!(f, "unknown({value})"),
        }
    }
}

/// The status of a job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobRequestStatus {
    /// No output has been submitted yet.
    WaitingForOutput,
    /// An output has been submitted and awaits verification.
    OutputReceived,
    /// The output has been verified.
    OutputVerified,
    /// A value outside the known range.
    Unknown(u64),
}

impl JobRequestStatus {
    /// The raw on-chain value.
    pub fn raw(&self) -> u64 {
        match self {
            JobRequestStatus::WaitingForOutput => 0,
            JobRequestStatus::OutputReceived => 1,
            JobRequestStatus::OutputVerified => 2,
            JobRequestStatus::Unknown(value) => *value,
        }
    }

    /// Resolves the label through [`JOB_REQUEST_STATUS`].
    pub fn label(&self) -> EnumLabel {
        JOB_REQUEST_STATUS.label(self.raw())
    }
}

impl From<u64> for JobRequestStatus {
    fn from(value: u64) -> Self {
        match value {
            0 => JobRequestStatus::WaitingForOutput,
            1 => JobRequestStatus::OutputReceived,
            2 => JobRequestStatus::OutputVerified,
            other => JobRequestStatus::Unknown(other),
        }
    }
}

impl fmt::Display for JobRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label().fmt(f)
    }
}

/// The state of a single verifier's work on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobVerificationState {
    /// The verifier has not started.
    NotStarted,
    /// The verifier is working through its token range.
    InProgress,
    /// The verifier has finished.
    Completed,
    /// A value outside the known range.
    Unknown(u64),
}

impl JobVerificationState {
    /// The raw on-chain value.
    pub fn raw(&self) -> u64 {
        match self {
            JobVerificationState::NotStarted => 0,
            JobVerificationState::InProgress => 1,
            JobVerificationState::Completed => 2,
            JobVerificationState::Unknown(value) => *value,
        }
    }

    /// Resolves the label through [`JOB_VERIFICATION_STATE`].
    pub fn label(&self) -> EnumLabel {
        JOB_VERIFICATION_STATE.label(self.raw())
    }
}

impl From<u64> for JobVerificationState {
    fn from(value: u64) -> Self {
        match value {
            0 => JobVerificationState::NotStarted,
            1 => JobVerificationState::InProgress,
            2 => JobVerificationState::Completed,
            other => JobVerificationState::Unknown(other),
        }
    }
}

impl fmt::Display for JobVerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label().fmt(f)
    }
}
