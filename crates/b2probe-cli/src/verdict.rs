//! Probe verdicts, errors, and Nagios exit codes.

use std::fmt;

use b2probe_client::ClientError;
use b2probe_schema::SchemaError;

/// Separator printed between the progress lines and the final verdict.
pub const SEPARATOR: &str = "---------------------------";

/// Nagios service states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit code for a base URL that cannot be parsed.
pub const EXIT_INVALID_URL: u8 = 3;

/// Successful end states of a probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The instance lists no public records; nothing further was checked.
    NoRecords,
    /// One record was fully checked.
    Healthy,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecords => write!(f, "{}", Status::Ok),
            Self::Healthy => write!(
                f,
                "{}: records, metadata schemas and files are accessible.",
                Status::Ok
            ),
        }
    }
}

/// Anything that ends a probe run early.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid URL syntax {0}")]
    InvalidUrl(String),

    #[error("It seems that there are no records stored in this B2SHARE instance")]
    NoRecords,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("cannot write probe output: {0}")]
    Output(#[from] std::io::Error),
}

impl ProbeError {
    pub fn status(&self) -> Status {
        Status::Critical
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidUrl(_) => EXIT_INVALID_URL,
            _ => self.status().exit_code(),
        }
    }
}
