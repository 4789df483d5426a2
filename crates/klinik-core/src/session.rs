//! Session store: the single bearer token and the authenticated flag.
//!
//! Written only by the login flow and the logout action; everything else reads.

use tracing::{debug, info};

use crate::storage::{LocalStorage, StorageResult};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "access_token";

/// Session state observed after another process changed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChange {
    pub authenticated: bool,
}

/// Token holder persisted in [`LocalStorage`].
pub struct SessionStore {
    storage: LocalStorage,
    authenticated: bool,
    seen_version: i64,
}

impl SessionStore {
    /// Load the session from storage.
    pub fn new(storage: LocalStorage) -> StorageResult<Self> {
        let authenticated = read_token(&storage)?.is_some();
        let seen_version = storage.data_version()?;
        Ok(Self {
            storage,
            authenticated,
            seen_version,
        })
    }

    /// Cached authentication flag.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Current persisted token, read fresh from storage.
    pub fn token(&self) -> StorageResult<Option<String>> {
        read_token(&self.storage)
    }

    /// Persist a token from a successful login.
    pub fn login(&mut self, token: &str) -> StorageResult<()> {
        self.storage.set_item(TOKEN_KEY, token)?;
        self.authenticated = true;
        info!("Session started");
        Ok(())
    }

    /// Clear the persisted token. Returns once storage no longer holds it.
    pub fn logout(&mut self) -> StorageResult<()> {
        self.storage.remove_item(TOKEN_KEY)?;
        self.authenticated = false;
        info!("Session cleared");
        Ok(())
    }

    /// Check whether another process changed storage since the last poll.
    pub fn poll_storage_event(&mut self) -> StorageResult<Option<SessionChange>> {
        let version = self.storage.data_version()?;
        if version == self.seen_version {
            return Ok(None);
        }
        self.seen_version = version;

        self.authenticated = read_token(&self.storage)?.is_some();
        debug!(authenticated = self.authenticated, "Storage changed elsewhere");
        Ok(Some(SessionChange {
            authenticated: self.authenticated,
        }))
    }
}

fn read_token(storage: &LocalStorage) -> StorageResult<Option<String>> {
    Ok(storage.get_item(TOKEN_KEY)?.filter(|t| !t.is_empty()))
}
