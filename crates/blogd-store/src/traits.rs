use async_trait::async_trait;
use blogd_types::DocumentId;

use crate::document::StoredDocument;
use crate::error::StoreResult;

/// Handle to a single named document collection.
///
/// Implementations must be safe to share across request tasks. Each method
/// is atomic on its own; callers composing several calls (read, then
/// replace) get no isolation between them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the collection this handle is bound to.
    fn collection(&self) -> &str;

    /// Insert a new document body and return the id the store assigned.
    async fn insert(&self, body: Vec<u8>) -> StoreResult<DocumentId>;

    /// Look up one document by id.
    ///
    /// Returns `Ok(None)` if no document matches.
    async fn find_one(&self, id: &DocumentId) -> StoreResult<Option<StoredDocument>>;

    /// Open a cursor over every document in the collection, unfiltered.
    async fn find_many(&self) -> StoreResult<Box<dyn DocumentCursor>>;

    /// Replace the body of the document with `id`. Returns the number of
    /// documents matched (0 or 1).
    async fn replace(&self, id: &DocumentId, body: Vec<u8>) -> StoreResult<u64>;

    /// Delete the document with `id`. Returns the number removed (0 or 1).
    async fn delete_one(&self, id: &DocumentId) -> StoreResult<u64>;
}

/// Sequential, one-at-a-time view over a result set.
///
/// Usage: call [`advance`](Self::advance) until it returns `false`, reading
/// [`current`](Self::current) after each `true`. Call
/// [`close`](Self::close) when done, whether or not the cursor was drained.
#[async_trait]
pub trait DocumentCursor: Send {
    /// Move to the next document. Returns `false` once exhausted.
    async fn advance(&mut self) -> StoreResult<bool>;

    /// The document the cursor is positioned on, if any.
    fn current(&self) -> Option<&StoredDocument>;

    /// Release the cursor's store-side resources. Idempotent.
    async fn close(&mut self);
}
