//! # couch-plugin
//!
//! Registers a configured CouchDB client with a plugin host.
//!
//! ```ignore
//! use couch_plugin::{CouchPlugin, Exposed, MemoryServer};
//!
//! let mut server = MemoryServer::new();
//! server.register(&CouchPlugin, serde_json::json!({"db": "users"}))?;
//!
//! let couch = server.plugin::<Exposed>("couch-plugin").unwrap();
//! couch.db.upsert("alice", doc).await?;
//! ```
//!
//! Outside a host, [`init`] builds the same handles from the same options.

pub mod error;
pub mod host;
pub mod plugin;

pub use error::Error;
pub use host::{LogEntry, MemoryServer, Server};
pub use plugin::{init, CouchPlugin, Exposed, Plugin, PluginAttributes};
