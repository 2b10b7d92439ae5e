use std::sync::Arc;

use tracing::{debug, error, info, warn};

use blogd_protocol::{
    CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse,
    FindBlogRequest, FindBlogResponse, ListBlogsRequest, UpdateBlogRequest, UpdateBlogResponse,
};
use blogd_store::{BlogDocument, DocumentCursor, DocumentStore};
use blogd_types::DocumentId;

use crate::error::{ServiceError, ServiceResult};
use crate::mapper;

/// Blog record operations over an injected document store.
///
/// Every method either returns a response or a classified [`ServiceError`];
/// store errors never leave this type unclassified.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn DocumentStore>,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Insert a new blog. Any id the client sent is ignored.
    pub async fn create_blog(&self, req: CreateBlogRequest) -> ServiceResult<CreateBlogResponse> {
        let mut doc = mapper::to_document(&req.blog, None);
        let body = doc.encode().map_err(|e| internal("failed to encode blog", e))?;

        let id = self
            .store
            .insert(body)
            .await
            .map_err(|e| internal("failed to insert blog", e))?;
        if id.is_null() {
            error!(collection = %self.store.collection(), "store reported a null id for insert");
            return Err(ServiceError::Internal("store did not assign a valid id".into()));
        }

        doc.id = Some(id);
        info!(%id, author_id = doc.author_id, "blog created");
        Ok(CreateBlogResponse { blog: mapper::to_record(&doc) })
    }

    pub async fn find_blog(&self, req: FindBlogRequest) -> ServiceResult<FindBlogResponse> {
        let id = lookup_id(&req.blog_id)?;
        let doc = self.load(&id).await?;
        debug!(%id, "blog found");
        Ok(FindBlogResponse { blog: mapper::to_record(&doc) })
    }

    /// Overwrite `author_id`, `title` and `content` of an existing blog.
    ///
    /// Read and replace are separate store calls. Two updates racing on the
    /// same id both succeed and the later replace wins.
    pub async fn update_blog(&self, req: UpdateBlogRequest) -> ServiceResult<UpdateBlogResponse> {
        let id = lookup_id(&req.blog.id)?;
        let existing = self.load(&id).await?;

        let updated = mapper::to_document(&req.blog, existing.id);
        let body = updated.encode().map_err(|e| internal("failed to encode blog", e))?;
        let matched = self
            .store
            .replace(&id, body)
            .await
            .map_err(|e| internal("failed to replace blog", e))?;
        if matched == 0 {
            warn!(%id, "blog vanished between read and replace");
            return Err(ServiceError::NotFound(format!("no blog with id {id}")));
        }

        info!(%id, "blog updated");
        Ok(UpdateBlogResponse { blog: mapper::to_record(&updated) })
    }

    /// Delete a blog. Deleting an id that matches nothing succeeds with a
    /// count of zero.
    pub async fn delete_blog(&self, req: DeleteBlogRequest) -> ServiceResult<DeleteBlogResponse> {
        let id = DocumentId::from_hex(&req.blog_id).map_err(|e| {
            warn!(blog_id = %req.blog_id, error = %e, "rejected delete");
            ServiceError::NotFound(format!("cannot delete blog with id {:?}: {e}", req.blog_id))
        })?;

        let deleted = self
            .store
            .delete_one(&id)
            .await
            .map_err(|e| internal("failed to delete blog", e))?;

        info!(%id, deleted, "blog delete processed");
        Ok(DeleteBlogResponse { result: deletion_summary(deleted), deleted_count: deleted })
    }

    /// Open a cursor over the whole collection for the list stream.
    pub async fn list_blogs(&self, _req: ListBlogsRequest) -> ServiceResult<Box<dyn DocumentCursor>> {
        let cursor = self
            .store
            .find_many()
            .await
            .map_err(|e| internal("failed to open blog cursor", e))?;
        debug!(collection = %self.store.collection(), "list cursor opened");
        Ok(cursor)
    }

    async fn load(&self, id: &DocumentId) -> ServiceResult<BlogDocument> {
        let stored = self
            .store
            .find_one(id)
            .await
            .map_err(|e| internal("failed to look up blog", e))?
            .ok_or_else(|| ServiceError::NotFound(format!("no blog with id {id}")))?;

        BlogDocument::decode(&stored).map_err(|e| {
            warn!(%id, error = %e, "stored blog could not be decoded");
            ServiceError::NotFound(format!("no readable blog with id {id}"))
        })
    }
}

/// Validate a client-supplied id for lookups. Empty is rejected before any
/// store call.
fn lookup_id(raw: &str) -> ServiceResult<DocumentId> {
    if raw.is_empty() {
        warn!("rejected request with empty blog id");
        return Err(ServiceError::NotFound("blog id is empty".into()));
    }
    DocumentId::from_hex(raw).map_err(|e| {
        warn!(blog_id = %raw, error = %e, "rejected malformed blog id");
        ServiceError::InvalidArgument(format!("invalid blog id {raw:?}: {e}"))
    })
}

fn internal(context: &str, err: impl std::fmt::Display) -> ServiceError {
    error!(error = %err, "{context}");
    ServiceError::Internal(format!("{context}: {err}"))
}

fn deletion_summary(deleted: u64) -> String {
    if deleted == 1 {
        "Deleted 1 record".to_string()
    } else {
        format!("Deleted {deleted} records")
    }
}
