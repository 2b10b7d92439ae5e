/// HTTP endpoint paths for the blogd protocol.
pub mod endpoints {
    pub const CREATE_BLOG: &str = "/v1/blog/create";
    pub const FIND_BLOG: &str = "/v1/blog/find";
    pub const UPDATE_BLOG: &str = "/v1/blog/update";
    pub const DELETE_BLOG: &str = "/v1/blog/delete";
    pub const LIST_BLOGS: &str = "/v1/blog/list";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Content type of the list stream body.
pub const LIST_CONTENT_TYPE: &str = "application/x-ndjson";

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}
