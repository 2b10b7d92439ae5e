use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use blogd_types::DocumentId;
use tracing::trace;

use crate::document::StoredDocument;
use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentCursor, DocumentStore};

#[derive(Default)]
struct Collection {
    next_seq: u64,
    // Insertion order; replace keeps a document's position.
    documents: BTreeMap<u64, StoredDocument>,
    index: HashMap<DocumentId, u64>,
}

/// In-memory document collection.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and returned in insertion order by [`find_many`](DocumentStore::find_many).
/// Cursors iterate a snapshot taken when they are opened.
pub struct InMemoryDocumentStore {
    collection: String,
    inner: RwLock<Collection>,
    open_cursors: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    /// Create an empty collection with the given name.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            inner: RwLock::new(Collection::default()),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.documents.len())
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.documents.is_empty())
    }

    /// Remove every document.
    pub fn clear(&self) -> StoreResult<()> {
        let mut inner = self.write()?;
        inner.documents.clear();
        inner.index.clear();
        Ok(())
    }

    /// Cursors opened and not yet closed or dropped.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collection>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collection>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn insert(&self, body: Vec<u8>) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        if id.is_null() {
            return Err(StoreError::NullDocumentId);
        }
        let mut inner = self.write()?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.documents.insert(seq, StoredDocument::new(id, body));
        inner.index.insert(id, seq);
        trace!(collection = %self.collection, %id, "inserted document");
        Ok(id)
    }

    async fn find_one(&self, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        let inner = self.read()?;
        Ok(inner
            .index
            .get(id)
            .and_then(|seq| inner.documents.get(seq))
            .cloned())
    }

    async fn find_many(&self) -> StoreResult<Box<dyn DocumentCursor>> {
        let snapshot: VecDeque<StoredDocument> = self.read()?.documents.values().cloned().collect();
        trace!(collection = %self.collection, count = snapshot.len(), "opened cursor");
        Ok(Box::new(MemoryCursor::open(snapshot, self.open_cursors.clone())))
    }

    async fn replace(&self, id: &DocumentId, body: Vec<u8>) -> StoreResult<u64> {
        let mut inner = self.write()?;
        let Some(seq) = inner.index.get(id).copied() else {
            return Ok(0);
        };
        inner.documents.insert(seq, StoredDocument::new(*id, body));
        Ok(1)
    }

    async fn delete_one(&self, id: &DocumentId) -> StoreResult<u64> {
        let mut inner = self.write()?;
        match inner.index.remove(id) {
            Some(seq) => {
                inner.documents.remove(&seq);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.read().map(|inner| inner.documents.len()).ok();
        f.debug_struct("InMemoryDocumentStore")
            .field("collection", &self.collection)
            .field("document_count", &count)
            .field("open_cursors", &self.open_cursors())
            .finish()
    }
}

/// Decrements the store's open-cursor count when dropped.
struct CursorLease(Arc<AtomicUsize>);

impl CursorLease {
    fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for CursorLease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct MemoryCursor {
    pending: VecDeque<StoredDocument>,
    current: Option<StoredDocument>,
    lease: Option<CursorLease>,
}

impl MemoryCursor {
    fn open(pending: VecDeque<StoredDocument>, counter: Arc<AtomicUsize>) -> Self {
        Self {
            pending,
            current: None,
            lease: Some(CursorLease::acquire(counter)),
        }
    }
}

#[async_trait]
impl DocumentCursor for MemoryCursor {
    async fn advance(&mut self) -> StoreResult<bool> {
        if self.lease.is_none() {
            return Err(StoreError::CursorClosed);
        }
        self.current = self.pending.pop_front();
        Ok(self.current.is_some())
    }

    fn current(&self) -> Option<&StoredDocument> {
        self.current.as_ref()
    }

    async fn close(&mut self) {
        self.pending.clear();
        self.current = None;
        self.lease = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlogDocument;

    fn body(title: &str) -> Vec<u8> {
        BlogDocument::new(1, title, "content").encode().unwrap()
    }

    async fn drain(store: &InMemoryDocumentStore) -> Vec<StoredDocument> {
        let mut cursor = store.find_many().await.unwrap();
        let mut out = Vec::new();
        while cursor.advance().await.unwrap() {
            out.push(cursor.current().unwrap().clone());
        }
        cursor.close().await;
        out
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn insert_assigns_unique_ids() {
        let store = InMemoryDocumentStore::new("blog");
        let a = store.insert(body("a")).await.unwrap();
        let b = store.insert(body("b")).await.unwrap();
        assert_ne!(a, b);
        assert!(!a.is_null());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn find_one_returns_inserted_body() {
        let store = InMemoryDocumentStore::new("blog");
        let id = store.insert(body("hello")).await.unwrap();
        let found = store.find_one(&id).await.unwrap().expect("should exist");
        assert_eq!(found.id, id);
        assert_eq!(found.body, body("hello"));
    }

    #[tokio::test]
    async fn find_one_missing_is_none() {
        let store = InMemoryDocumentStore::new("blog");
        assert!(store.find_one(&DocumentId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_existing() {
        let store = InMemoryDocumentStore::new("blog");
        let id = store.insert(body("old")).await.unwrap();
        assert_eq!(store.replace(&id, body("new")).await.unwrap(), 1);
        let found = store.find_one(&id).await.unwrap().unwrap();
        assert_eq!(found.body, body("new"));
    }

    #[tokio::test]
    async fn replace_missing_matches_nothing() {
        let store = InMemoryDocumentStore::new("blog");
        assert_eq!(store.replace(&DocumentId::generate(), body("x")).await.unwrap(), 0);
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let store = InMemoryDocumentStore::new("blog");
        let id = store.insert(body("x")).await.unwrap();
        assert_eq!(store.delete_one(&id).await.unwrap(), 1);
        assert_eq!(store.delete_one(&id).await.unwrap(), 0);
        assert!(store.find_one(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_empties_collection() {
        let store = InMemoryDocumentStore::new("blog");
        store.insert(body("x")).await.unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn collection_name() {
        let store = InMemoryDocumentStore::new("blog");
        assert_eq!(store.collection(), "blog");
    }

    // -----------------------------------------------------------------------
    // Cursors
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn cursor_on_empty_collection() {
        let store = InMemoryDocumentStore::new("blog");
        assert!(drain(&store).await.is_empty());
        assert_eq!(store.open_cursors(), 0);
    }

    #[tokio::test]
    async fn cursor_yields_insertion_order() {
        let store = InMemoryDocumentStore::new("blog");
        let ids = [
            store.insert(body("1")).await.unwrap(),
            store.insert(body("2")).await.unwrap(),
            store.insert(body("3")).await.unwrap(),
        ];
        let seen: Vec<DocumentId> = drain(&store).await.into_iter().map(|d| d.id).collect();
        assert_eq!(seen, ids);
    }

    #[tokio::test]
    async fn replace_keeps_position() {
        let store = InMemoryDocumentStore::new("blog");
        let first = store.insert(body("1")).await.unwrap();
        let second = store.insert(body("2")).await.unwrap();
        store.replace(&first, body("1b")).await.unwrap();
        let seen: Vec<DocumentId> = drain(&store).await.into_iter().map(|d| d.id).collect();
        assert_eq!(seen, vec![first, second]);
    }

    #[tokio::test]
    async fn cursor_is_a_snapshot() {
        let store = InMemoryDocumentStore::new("blog");
        store.insert(body("1")).await.unwrap();
        let mut cursor = store.find_many().await.unwrap();
        store.insert(body("2")).await.unwrap();
        let mut count = 0;
        while cursor.advance().await.unwrap() {
            count += 1;
        }
        assert_eq!(count, 1);
        cursor.close().await;
    }

    #[tokio::test]
    async fn close_releases_and_blocks_advance() {
        let store = InMemoryDocumentStore::new("blog");
        store.insert(body("1")).await.unwrap();
        let mut cursor = store.find_many().await.unwrap();
        assert_eq!(store.open_cursors(), 1);
        cursor.close().await;
        assert_eq!(store.open_cursors(), 0);
        assert!(cursor.current().is_none());
        assert!(matches!(cursor.advance().await, Err(StoreError::CursorClosed)));
        cursor.close().await;
        assert_eq!(store.open_cursors(), 0);
    }

    #[tokio::test]
    async fn drop_releases_cursor() {
        let store = InMemoryDocumentStore::new("blog");
        let cursor = store.find_many().await.unwrap();
        assert_eq!(store.open_cursors(), 1);
        drop(cursor);
        assert_eq!(store.open_cursors(), 0);
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let store = Arc::new(InMemoryDocumentStore::new("blog"));
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(body(&i.to_string())).await.unwrap()
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().unwrap(), 32);
    }

    #[test]
    fn debug_output() {
        let store = InMemoryDocumentStore::new("blog");
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryDocumentStore"));
        assert!(debug.contains("blog"));
    }
}
