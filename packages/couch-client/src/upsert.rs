//! Create-or-overwrite of a single document.

use crate::document::{revision, Document, DocumentStore, WriteAck, REV_FIELD};
use crate::error::Error;

/// Write `data` at `id`, creating the document or overwriting the current one.
///
/// Reads the document first. A not-found read means create: `data` is written
/// as given. A successful read copies the current `_rev` onto `data` so the
/// write replaces that revision; if the read carries no usable `_rev`, any
/// `_rev` in `data` is dropped. Any other read error is returned and nothing
/// is written.
///
/// The read and the write are separate requests. A concurrent writer can bump
/// the revision in between, in which case the write fails with a 409 conflict
/// that is returned as-is; there is no retry.
pub async fn upsert<S>(store: &S, id: &str, mut data: Document) -> Result<WriteAck, Error>
where
    S: DocumentStore + ?Sized,
{
    match store.get_document(id).await {
        Ok(existing) => match revision(&existing) {
            Some(rev) => {
                tracing::debug!(id, rev, "upsert: updating existing document");
                data.insert(REV_FIELD.to_string(), rev.into());
            }
            None => {
                tracing::debug!(id, "upsert: existing document has no revision");
                data.remove(REV_FIELD);
            }
        },
        Err(e) if e.is_not_found() => {
            tracing::debug!(id, "upsert: creating document");
        }
        Err(e) => return Err(e),
    }

    store.put_document(id, &data).await
}
