//! Foundation types for blogd.
//!
//! Every other blogd crate depends on `blogd-types` for the document
//! identifier and its string encoding.
//!
//! # Key Types
//!
//! - [`DocumentId`] -- 12-byte store-generated identifier, hex-encoded on the wire
//! - [`TypeError`] -- failures decoding an identifier from untrusted input

pub mod error;
pub mod id;

pub use error::TypeError;
pub use id::{DocumentId, DOCUMENT_ID_HEX_LEN, DOCUMENT_ID_LEN};
