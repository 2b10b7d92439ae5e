//! Wire protocol for blogd.
//!
//! Defines the request and response messages exchanged with clients, the
//! structured error body, and the newline-delimited framing used to stream
//! the list operation.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::FrameCodec;
pub use endpoint::{endpoints, HealthResponse, LIST_CONTENT_TYPE};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    Blog, CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse,
    ErrorBody, ErrorKind, FindBlogRequest, FindBlogResponse, ListBlogsRequest, ListFrame,
    UpdateBlogRequest, UpdateBlogResponse, MAX_FRAME_SIZE, PROTOCOL_VERSION,
};
