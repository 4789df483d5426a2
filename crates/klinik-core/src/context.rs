//! Application context shared by every screen.

use thiserror::Error;
use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::storage::{LocalStorage, StorageError, StorageResult};

/// Startup errors.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// Session plus API client, created once at startup and passed by reference.
pub struct AppContext {
    pub session: SessionStore,
    pub api: ApiClient,
}

impl AppContext {
    pub fn new(session: SessionStore, api: ApiClient) -> Self {
        Self { session, api }
    }

    /// Open storage, restore the persisted token and build the HTTP client.
    pub fn init(config: &ClientConfig) -> Result<Self, InitError> {
        let storage = LocalStorage::open(&config.storage_path)?;
        let session = SessionStore::new(storage)?;
        let api = ApiClient::http(config.base_url.clone())?;
        Ok(Self::new(session, api))
    }

    /// Context with in-memory storage (for testing).
    pub fn in_memory(api: ApiClient) -> StorageResult<Self> {
        let session = SessionStore::new(LocalStorage::open_in_memory()?)?;
        Ok(Self::new(session, api))
    }

    /// Token to authenticate with, or `None` when the user must log in.
    ///
    /// Unreadable storage counts as logged out.
    pub fn bearer(&self) -> Option<String> {
        match self.session.token() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;

    #[test]
    fn test_bearer_follows_session() {
        let mock = MockTransport::new();
        let mut ctx = AppContext::in_memory(mock.client()).unwrap();
        assert_eq!(ctx.bearer(), None);

        ctx.session.login("T1").unwrap();
        assert_eq!(ctx.bearer(), Some("T1".into()));
    }

    #[test]
    fn test_init_restores_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            storage_path: dir.path().join("storage.sqlite3"),
            ..ClientConfig::default()
        };

        {
            let mut ctx = AppContext::init(&config).unwrap();
            ctx.session.login("T1").unwrap();
        }

        let ctx = AppContext::init(&config).unwrap();
        assert!(ctx.session.is_authenticated());
        assert_eq!(ctx.api.base_url(), config.base_url);
    }
}
