//! HTTP execution abstraction.
//!
//! [`HttpExecutor`] is the seam between the CouchDB handles and the network.
//! [`ReqwestExecutor`] talks to a real server; tests swap in the recording
//! mock from the `mock` module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::config::{BasicAuth, TransportConfig};
use crate::error::Error;
use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests against one CouchDB server.
///
/// Any status code is a successful execution; mapping non-2xx responses to
/// errors is left to the caller.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
    base_url: Url,
    auth: Option<BasicAuth>,
}

impl ReqwestExecutor {
    /// Executor for a bare server URL with reqwest defaults.
    pub fn new(base_url: Url) -> Result<Self, Error> {
        Self::with_transport(base_url, &TransportConfig::default())
    }

    /// Executor configured from transport options (headers, auth, timeout).
    pub fn with_transport(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("{} cannot be used as a base URL", base_url),
            });
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &transport.headers {
            headers.insert(
                HeaderName::try_from(name.as_str())?,
                HeaderValue::try_from(value.as_str())?,
            );
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout_ms) = transport.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            auth: transport.auth.clone(),
        })
    }

    /// Append raw path segments to the server URL, percent-encoding each.
    fn resolve(&self, segments: &[String]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let url = self.resolve(&request.path)?;
        let method: http::Method = request.method.into();
        tracing::debug!(%method, path = %request.display_path(), "couchdb request");

        let mut req_builder = self.client.request(method, url);

        if let Some(auth) = &self.auth {
            req_builder = req_builder.basic_auth(&auth.username, auth.password.as_ref());
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let body_text = response.text().await?;
        let body = serde_json::from_str(&body_text).unwrap_or(serde_json::Value::Null);

        Ok(HttpResponse {
            status,
            status_text,
            body,
            body_text: Some(body_text),
        })
    }
}
