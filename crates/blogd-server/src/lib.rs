//! HTTP server for blogd.
//!
//! Exposes create, find, update, and delete over single blog records, plus a
//! streaming list of the whole collection. Handlers talk to storage only
//! through an injected [`blogd_store::DocumentStore`], and every failure
//! reaches the client as a classified [`ServiceError`].

pub mod config;
pub mod error;
pub mod handler;
pub mod mapper;
pub mod router;
pub mod server;
pub mod service;
pub mod stream;

#[cfg(test)]
mod testing;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult, ServiceError, ServiceResult};
pub use handler::AppState;
pub use server::BlogServer;
pub use service::BlogService;
pub use stream::EmitOutcome;
