use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A CouchDB document: an arbitrary JSON object owned by the caller.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Reserved field holding the revision token.
pub const REV_FIELD: &str = "_rev";

/// CouchDB's acknowledgment of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    #[serde(default)]
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

/// Revision token of a document, if it carries one.
pub fn revision(doc: &Document) -> Option<&str> {
    doc.get(REV_FIELD).and_then(|rev| rev.as_str())
}

/// Reject ids that would not land on a document path.
///
/// `""`, `"."` and `".."` collapse into the database URL itself, where `PUT`
/// means "create database".
pub fn check_id(id: &str) -> Result<(), Error> {
    match id {
        "" | "." | ".." => Err(Error::InvalidDocumentId { id: id.to_string() }),
        _ => Ok(()),
    }
}

/// Read-by-id and write-by-id on a single database.
///
/// `get_document` must report a missing or deleted document as an error for
/// which [`Error::is_not_found`] holds.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_document(&self, id: &str) -> Result<Document, Error>;

    async fn put_document(&self, id: &str, doc: &Document) -> Result<WriteAck, Error>;
}
