//! Substitutable store for exercising error classification.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use blogd_store::{
    DocumentCursor, DocumentStore, InMemoryDocumentStore, StoreError, StoreResult, StoredDocument,
};
use blogd_types::DocumentId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Insert,
    FindOne,
    FindMany,
    Replace,
    Delete,
}

/// In-memory store with injectable failures and call accounting.
pub struct FakeStore {
    inner: InMemoryDocumentStore,
    failing: HashSet<Op>,
    null_insert: bool,
    zero_replace: bool,
    fail_advance_after: Option<usize>,
    calls: AtomicUsize,
    advances: Arc<AtomicUsize>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            inner: InMemoryDocumentStore::new("blog"),
            failing: HashSet::new(),
            null_insert: false,
            zero_replace: false,
            fail_advance_after: None,
            calls: AtomicUsize::new(0),
            advances: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    /// Insert reports success with the null id.
    pub fn with_null_insert(mut self) -> Self {
        self.null_insert = true;
        self
    }

    /// Replace reports that nothing matched, as if the document vanished
    /// after it was read.
    pub fn with_zero_replace(mut self) -> Self {
        self.zero_replace = true;
        self
    }

    /// Cursors error out after yielding `n` documents.
    pub fn fail_advance_after(mut self, n: usize) -> Self {
        self.fail_advance_after = Some(n);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn advances(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }

    pub fn open_cursors(&self) -> usize {
        self.inner.open_cursors()
    }

    /// Store a body as-is, bypassing failure injection.
    pub async fn insert_raw(&self, body: &[u8]) -> DocumentId {
        self.inner.insert(body.to_vec()).await.unwrap()
    }

    fn enter(&self, op: Op) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    fn collection(&self) -> &str {
        self.inner.collection()
    }

    async fn insert(&self, body: Vec<u8>) -> StoreResult<DocumentId> {
        self.enter(Op::Insert)?;
        if self.null_insert {
            return Ok(DocumentId::null());
        }
        self.inner.insert(body).await
    }

    async fn find_one(&self, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        self.enter(Op::FindOne)?;
        self.inner.find_one(id).await
    }

    async fn find_many(&self) -> StoreResult<Box<dyn DocumentCursor>> {
        self.enter(Op::FindMany)?;
        let inner = self.inner.find_many().await?;
        Ok(Box::new(FakeCursor {
            inner,
            fail_after: self.fail_advance_after,
            yielded: 0,
            advances: self.advances.clone(),
        }))
    }

    async fn replace(&self, id: &DocumentId, body: Vec<u8>) -> StoreResult<u64> {
        self.enter(Op::Replace)?;
        if self.zero_replace {
            return Ok(0);
        }
        self.inner.replace(id, body).await
    }

    async fn delete_one(&self, id: &DocumentId) -> StoreResult<u64> {
        self.enter(Op::Delete)?;
        self.inner.delete_one(id).await
    }
}

struct FakeCursor {
    inner: Box<dyn DocumentCursor>,
    fail_after: Option<usize>,
    yielded: usize,
    advances: Arc<AtomicUsize>,
}

#[async_trait]
impl DocumentCursor for FakeCursor {
    async fn advance(&mut self) -> StoreResult<bool> {
        self.advances.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|n| self.yielded >= n) {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        let more = self.inner.advance().await?;
        if more {
            self.yielded += 1;
        }
        Ok(more)
    }

    fn current(&self) -> Option<&StoredDocument> {
        self.inner.current()
    }

    async fn close(&mut self) {
        self.inner.close().await;
    }
}
