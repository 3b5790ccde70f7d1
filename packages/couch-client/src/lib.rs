//! # couch-client
//!
//! A small CouchDB client: validated connection options, a server handle, a
//! database-bound handle, and a create-or-overwrite helper.
//!
//! ```ignore
//! use couch_client::{initialize, Config, Document};
//!
//! let handle = initialize(&Config::new("users").with_url("http://localhost:5984"))?;
//!
//! let mut doc = Document::new();
//! doc.insert("name".into(), "Alice".into());
//!
//! // Creates the document, or overwrites it with the current _rev attached.
//! let ack = handle.db.upsert("alice", doc).await?;
//! ```
//!
//! Failures can be turned into a uniform `{error, statusCode, message}`
//! shape with [`decorate`].

pub mod config;
pub mod couch;
pub mod document;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod types;
pub mod upsert;

pub use config::{BasicAuth, Config, ConfigError, ResolvedConfig, TransportConfig, DEFAULT_URL};
pub use couch::{initialize, ClientHandle, Couch, Database};
pub use document::{Document, DocumentStore, WriteAck};
pub use envelope::{decorate, ErrorEnvelope, StatusCoded};
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use types::{HttpRequest, HttpResponse, Method};
pub use upsert::upsert;
