use blogd_types::DocumentId;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization failure while encoding a document body.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored body could not be decoded into the expected shape.
    #[error("corrupt document {id}: {reason}")]
    CorruptDocument { id: DocumentId, reason: String },

    /// The store produced or was handed the null identifier.
    #[error("null document id")]
    NullDocumentId,

    /// The cursor was used after being closed.
    #[error("cursor is closed")]
    CursorClosed,

    /// The backend cannot serve requests (lost connection, poisoned state).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
