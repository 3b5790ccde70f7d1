//! Connection options.
//!
//! Options arrive either as a typed [`Config`] or as the JSON object a plugin
//! host hands to `register`. Validation is a pure step that produces a
//! [`ResolvedConfig`] with defaults applied; nothing here touches the network.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// URL used when the options do not name one.
pub const DEFAULT_URL: &str = "http://localhost:5984";

/// Plugin options as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CouchDB server URL. Defaults to [`DEFAULT_URL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Transport overrides. When present the transport is built from this
    /// object, with `url` replaced by the resolved server URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<TransportConfig>,

    /// Target database name. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
}

/// Connection-level options for the HTTP transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    /// Server URL. Always overwritten by [`Config::validate`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Headers sent with every request.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<BasicAuth>,

    /// Per-request timeout in milliseconds. No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Why a set of options was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("malformed options: {message}")]
    Malformed { message: String },

    #[error("\"db\" is required")]
    MissingDb,

    #[error("\"db\" is not allowed to be empty")]
    EmptyDb,

    #[error("\"db\" {db:?} is not a valid database name")]
    InvalidDb { db: String },

    #[error("\"url\" {url:?} is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Options after validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// The server URL as configured (or defaulted).
    pub url: String,
    pub base_url: Url,
    pub db: String,
    /// Transport overrides with `url` set to [`ResolvedConfig::url`].
    pub request: Option<TransportConfig>,
}

impl Config {
    /// Options naming only a database; everything else defaults.
    pub fn new(db: impl Into<String>) -> Self {
        Self {
            db: Some(db.into()),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_request(mut self, request: TransportConfig) -> Self {
        self.request = Some(request);
        self
    }

    /// Parse options from a host-supplied JSON value. `null` means "no options".
    pub fn from_options(options: serde_json::Value) -> Result<Self, ConfigError> {
        if options.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(options).map_err(|e| ConfigError::Malformed {
            message: e.to_string(),
        })
    }

    /// Check the options and apply defaults.
    pub fn validate(&self) -> Result<ResolvedConfig, ConfigError> {
        let db = match self.db.as_deref() {
            None => return Err(ConfigError::MissingDb),
            Some("") => return Err(ConfigError::EmptyDb),
            Some(db) => {
                check_db_name(db)?;
                db.to_string()
            }
        };

        let url = self.url.clone().unwrap_or_else(|| DEFAULT_URL.to_string());
        let base_url = parse_server_url(&url)?;

        let request = self.request.clone().map(|mut request| {
            request.url = Some(url.clone());
            request
        });

        Ok(ResolvedConfig {
            url,
            base_url,
            db,
            request,
        })
    }
}

/// Databases CouchDB creates itself; the only names allowed to start with `_`.
const SYSTEM_DATABASES: [&str; 3] = ["_users", "_replicator", "_global_changes"];

/// Check `db` against CouchDB's naming rule: a lowercase letter followed by
/// lowercase letters, digits or any of `_$()+-/`.
pub fn check_db_name(db: &str) -> Result<(), ConfigError> {
    if SYSTEM_DATABASES.contains(&db) {
        return Ok(());
    }

    let mut chars = db.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c)
        });

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidDb { db: db.to_string() })
    }
}

fn parse_server_url(url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    if parsed.cannot_be_a_base() || !parsed.has_host() {
        return Err(invalid("expected an absolute URL with a host".to_string()));
    }
    Ok(parsed)
}
