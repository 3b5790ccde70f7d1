//! Uniform error shape for host applications.
//!
//! [`decorate`] builds a fresh [`ErrorEnvelope`] from anything carrying an
//! HTTP status; the source error is left untouched.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Status used when the source has no error status of its own.
pub const DEFAULT_STATUS: u16 = 500;

/// Kind, status code and message of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Reason phrase for `status_code` (e.g. "Not Found").
    #[serde(rename = "error")]
    pub kind: String,
    pub status_code: u16,
    pub message: String,
}

/// Something that can be turned into an [`ErrorEnvelope`].
pub trait StatusCoded {
    fn status_code(&self) -> Option<u16>;

    fn message(&self) -> String;
}

impl StatusCoded for Error {
    fn status_code(&self) -> Option<u16> {
        Error::status_code(self)
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

impl StatusCoded for ErrorEnvelope {
    fn status_code(&self) -> Option<u16> {
        Some(self.status_code)
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

/// Build an envelope from `error`.
///
/// Missing statuses and statuses below 400 become [`DEFAULT_STATUS`].
pub fn decorate<E: StatusCoded + ?Sized>(error: &E) -> ErrorEnvelope {
    let status_code = error
        .status_code()
        .filter(|code| (400..600).contains(code))
        .unwrap_or(DEFAULT_STATUS);

    let kind = http::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown")
        .to_string();

    ErrorEnvelope {
        kind,
        status_code,
        message: error.message(),
    }
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        decorate(error)
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.status_code, self.message)
    }
}

impl std::error::Error for ErrorEnvelope {}
