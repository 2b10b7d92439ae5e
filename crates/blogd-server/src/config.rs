use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use blogd_protocol::MAX_FRAME_SIZE;

/// Room left in a list frame for the envelope around a stored blog.
const FRAME_ENVELOPE_HEADROOM: usize = 1024;

/// Largest accepted `max_body_bytes`.
pub const MAX_BODY_LIMIT: usize = MAX_FRAME_SIZE - FRAME_ENVELOPE_HEADROOM;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database: String,
    pub collection: String,
    /// Frames buffered between the list emitter and the response body.
    pub stream_buffer: usize,
    /// Request body cap, at most [`MAX_BODY_LIMIT`] so every blog that can be
    /// created also fits in a list frame.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 50051)),
            database: "blogdb".into(),
            collection: "blog".into(),
            stream_buffer: 32,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.collection.trim().is_empty() {
            return Err(ServerError::Config("collection name must not be empty".into()));
        }
        if self.stream_buffer == 0 {
            return Err(ServerError::Config("stream_buffer must be at least 1".into()));
        }
        if self.max_body_bytes == 0 {
            return Err(ServerError::Config("max_body_bytes must be at least 1".into()));
        }
        if self.max_body_bytes > MAX_BODY_LIMIT {
            return Err(ServerError::Config(format!(
                "max_body_bytes must be at most {MAX_BODY_LIMIT} to fit in a list frame"
            )));
        }
        Ok(())
    }
}
