//! Server and database handles.
//!
//! [`Couch`] is the transport-level client for one server; [`Couch::use_db`]
//! binds a [`Database`]. Both are cheap to clone and share one executor, so a
//! single [`ClientHandle`] built at startup serves every request.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::config::{check_db_name, Config, TransportConfig};
use crate::document::{check_id, Document, DocumentStore, WriteAck};
use crate::error::Error;
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::types::{HttpRequest, HttpResponse};

/// Transport-level client bound to one CouchDB server.
#[derive(Clone)]
pub struct Couch {
    url: String,
    executor: Arc<dyn HttpExecutor>,
}

impl Couch {
    /// Client for a bare server URL.
    pub fn new(url: &str) -> Result<Self, Error> {
        let executor = ReqwestExecutor::new(Url::parse(url)?)?;
        Ok(Self::with_executor(url, Arc::new(executor)))
    }

    /// Client built from full transport options. `transport.url` must be set.
    pub fn from_transport(transport: &TransportConfig) -> Result<Self, Error> {
        let url = transport.url.as_deref().ok_or_else(|| Error::InvalidUrl {
            message: "transport configuration has no url".to_string(),
        })?;
        let executor = ReqwestExecutor::with_transport(Url::parse(url)?, transport)?;
        Ok(Self::with_executor(url, Arc::new(executor)))
    }

    /// Client over a caller-supplied executor.
    pub fn with_executor(url: impl Into<String>, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            url: url.into(),
            executor,
        }
    }

    /// Server URL this client was built for.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// [`Couch::url`] without its password, for logs and `Debug`.
    pub fn display_url(&self) -> String {
        redact_password(&self.url)
    }

    /// Bind a handle to the named database. Does not check that it exists.
    pub fn use_db(&self, name: impl Into<String>) -> Database {
        Database {
            name: name.into(),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl std::fmt::Debug for Couch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Couch")
            .field("url", &self.display_url())
            .finish()
    }
}

/// Database-scoped client.
#[derive(Clone)]
pub struct Database {
    name: String,
    executor: Arc<dyn HttpExecutor>,
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path segments of document `id`, after checking both the database name
    /// and the id resolve to a document URL.
    fn document_path<'a>(&'a self, id: &'a str) -> Result<[&'a str; 2], Error> {
        check_db_name(&self.name)?;
        check_id(id)?;
        Ok([self.name.as_str(), id])
    }

    /// Fetch a document, including its `_rev`.
    pub async fn get(&self, id: &str) -> Result<Document, Error> {
        let request = HttpRequest::get(self.document_path(id)?);
        let response = check(self.executor.execute(&request).await?)?;
        Ok(response.json()?)
    }

    /// Create or overwrite a document. Overwriting requires `doc` to carry the
    /// current `_rev`; otherwise CouchDB answers 409.
    pub async fn insert(&self, id: &str, doc: &Document) -> Result<WriteAck, Error> {
        let body = serde_json::Value::Object(doc.clone());
        let request = HttpRequest::put(self.document_path(id)?).with_json_body(body);
        let response = check(self.executor.execute(&request).await?)?;
        Ok(response.json()?)
    }

    /// See [`upsert`](crate::upsert::upsert).
    pub async fn upsert(&self, id: &str, data: Document) -> Result<WriteAck, Error> {
        crate::upsert::upsert(self, id, data).await
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("name", &self.name).finish()
    }
}

#[async_trait]
impl DocumentStore for Database {
    async fn get_document(&self, id: &str) -> Result<Document, Error> {
        self.get(id).await
    }

    async fn put_document(&self, id: &str, doc: &Document) -> Result<WriteAck, Error> {
        self.insert(id, doc).await
    }
}

/// Turn a non-2xx response into [`Error::Couch`].
fn check(response: HttpResponse) -> Result<HttpResponse, Error> {
    if response.is_success() {
        return Ok(response);
    }

    let field = |key: &str| {
        response
            .body
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    Err(Error::Couch {
        status: response.status,
        error: field("error").unwrap_or_else(|| response.status_text.clone()),
        reason: field("reason")
            .or_else(|| response.body_text.clone())
            .unwrap_or_default(),
    })
}

fn redact_password(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            // Only fails for URLs without a host, which have no password.
            let _ = parsed.set_password(None);
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}

/// The transport client and the database bound from it.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub couch: Couch,
    pub db: Database,
}

/// Validate `config`, build the transport and bind the configured database.
///
/// No request is sent.
pub fn initialize(config: &Config) -> Result<ClientHandle, Error> {
    let resolved = config.validate()?;

    let couch = match &resolved.request {
        Some(request) => Couch::from_transport(request)?,
        None => Couch::new(&resolved.url)?,
    };
    let db = couch.use_db(&resolved.db);

    Ok(ClientHandle { couch, db })
}
