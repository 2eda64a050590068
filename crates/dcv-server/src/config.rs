use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use dcv_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::error::{ServerError, ServerResult};

/// Server settings, loadable from TOML. Every key is optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub storage_root: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    pub store: StoreConfig,
    pub tokens: Vec<TokenConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            storage_root: PathBuf::from("storage"),
            max_upload_bytes: 512 * 1024 * 1024,
            store: StoreConfig::default(),
            tokens: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

/// One accepted API token.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub name: String,
    pub role: Role,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
