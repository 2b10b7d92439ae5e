use std::fmt;

use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

/// Wire representation of a blog entry.
///
/// Fields left out of a request take their zero value, so a client creating
/// a blog sends no `id` at all. An empty `id` means "not yet assigned".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    pub id: String,
    pub author_id: i32,
    pub title: String,
    pub content: String,
}

impl Blog {
    pub fn new(author_id: i32, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            author_id,
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub blog: Blog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlogResponse {
    pub blog: Blog,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindBlogRequest {
    pub blog_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindBlogResponse {
    pub blog: Blog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub blog: Blog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBlogResponse {
    pub blog: Blog,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteBlogRequest {
    pub blog_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBlogResponse {
    /// Human-readable outcome, e.g. `"Deleted 1 record"`.
    pub result: String,
    pub deleted_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlogsRequest {}

/// Classification of a failed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request is malformed (bad identifier syntax, undecodable body).
    InvalidArgument,
    /// The identifier is empty or matches no document.
    NotFound,
    /// The store failed or returned data that could not be decoded.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned with every failed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// One line of the list stream.
///
/// A stream is any number of `Blog` frames, optionally followed by a single
/// `Error` frame. A stream that ends without an `Error` frame completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListFrame {
    Blog { blog: Blog },
    Error { code: ErrorKind, message: String },
}

impl ListFrame {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Blog { .. } => "Blog",
            Self::Error { .. } => "Error",
        }
    }
}
