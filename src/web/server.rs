//! Web server for Filebay.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::store::FileStore;
use crate::Result;

use super::handlers::AppState;
use super::middleware::ApiKeyState;
use super::router::{create_health_router, create_router};

/// Web server for the Filebay API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// API key gate state.
    api_key_state: Arc<ApiKeyState>,
}

impl WebServer {
    /// Create a new web server from the process configuration.
    ///
    /// Initializes the file store (creating the storage root if needed).
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| crate::FilebayError::Config(format!("invalid server address: {e}")))?;

        let store = FileStore::new(&config.storage)?;
        tracing::info!(root = %store.root().display(), "file store initialized");

        if config.api.key.is_empty() {
            tracing::warn!(
                "no API key configured: mutating endpoints run in OPEN MODE \
                 (suitable for trusted networks only)"
            );
        }

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(store)),
            api_key_state: Arc::new(ApiKeyState::new(&config.api.key)),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        create_router(self.app_state.clone(), self.api_key_state.clone())
            .merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Filebay listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Filebay listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
