use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use blogd_store::DocumentStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::build_router;
use crate::service::BlogService;

/// blogd HTTP server.
///
/// Owns the configuration and a connected store handle. The store's own
/// lifecycle (connect, disconnect) belongs to the caller.
pub struct BlogServer {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
}

impl BlogServer {
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state())
    }

    fn state(&self) -> AppState {
        AppState::new(BlogService::new(self.store.clone()), self.config.clone())
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.config.validate()?;
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `signal` resolves.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        info!(
            addr = %listener.local_addr()?,
            collection = %self.store.collection(),
            "blogd listening"
        );
        axum::serve(listener, app).with_graceful_shutdown(signal).await?;
        info!("blogd stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            error!(error = %e, "cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
