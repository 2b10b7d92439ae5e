//! Document store gateway for blogd.
//!
//! The service reaches persistence through one capability: a handle to a
//! single named collection that supports insert, find-one, find-many (via a
//! cursor), replace, and delete-one, all keyed by [`DocumentId`].
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- insertion-ordered store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Identifiers are assigned by the store on insert and never change.
//! 2. Each individual operation is atomic; sequences of operations are not.
//! 3. The store never interprets document bodies. Decoding happens in
//!    [`BlogDocument::decode`], on the caller's side.
//! 4. A cursor holds store-side resources until [`DocumentCursor::close`] is
//!    called or the cursor is dropped.
//!
//! [`DocumentId`]: blogd_types::DocumentId

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::{BlogDocument, StoredDocument};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentCursor, DocumentStore};
