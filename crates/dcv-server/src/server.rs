use std::sync::Arc;

use dcv_service::FsDicomService;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::auth::{AuthProvider, StaticTokenAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// DICOM vault HTTP server.
pub struct DicomServer {
    config: ServerConfig,
    state: AppState,
}

impl DicomServer {
    /// Open the configured store and authenticate with the configured tokens.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let service = FsDicomService::open(&config.storage_root, config.store.clone())?;
        let auth = StaticTokenAuth::from_config(&config.tokens);
        if auth.is_empty() {
            warn!("no API tokens configured; protected routes will reject every request");
        }
        Ok(Self::with_parts(config, Arc::new(service), Arc::new(auth)))
    }

    /// Assemble a server from an existing service and auth provider.
    pub fn with_parts(
        config: ServerConfig,
        service: Arc<FsDicomService>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            state: AppState { service, auth },
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), self.config.max_upload_bytes)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            storage = %self.config.storage_root.display(),
            "DICOM vault listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
