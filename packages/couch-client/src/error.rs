use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid CouchDb options: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Empty or a dot-segment, which would address the database itself.
    #[error("Invalid document id {id:?}")]
    InvalidDocumentId { id: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A non-2xx response from CouchDB.
    ///
    /// `error` and `reason` come from the CouchDB error body
    /// (`{"error": "not_found", "reason": "missing"}`).
    #[error("CouchDb error {status}: {error} ({reason})")]
    Couch {
        status: u16,
        error: String,
        reason: String,
    },
}

impl Error {
    /// HTTP status code carried by this error, if the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Couch { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The document (or database) does not exist, or was deleted.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Revision mismatch on write.
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}
