use blogd_types::DocumentId;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A document as held by the store: its identifier and an opaque body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: Vec<u8>,
}

impl StoredDocument {
    pub fn new(id: DocumentId, body: Vec<u8>) -> Self {
        Self { id, body }
    }
}

/// Store-side shape of a blog entry.
///
/// `id` is `None` only between construction and insertion; every document
/// read back from a store carries the id it was stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub author_id: i32,
    pub title: String,
    pub content: String,
}

impl BlogDocument {
    /// A document not yet assigned an id.
    pub fn new(author_id: i32, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            author_id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Serialize into a store body.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decode a stored document.
    ///
    /// The id always comes from the store. A body that carries its own `_id`
    /// must agree with it.
    pub fn decode(stored: &StoredDocument) -> StoreResult<Self> {
        let mut doc: Self =
            serde_json::from_slice(&stored.body).map_err(|e| StoreError::CorruptDocument {
                id: stored.id,
                reason: e.to_string(),
            })?;
        if let Some(embedded) = doc.id {
            if embedded != stored.id {
                return Err(StoreError::CorruptDocument {
                    id: stored.id,
                    reason: format!("embedded id {embedded} does not match"),
                });
            }
        }
        doc.id = Some(stored.id);
        Ok(doc)
    }
}
