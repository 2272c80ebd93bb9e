//! Persistent storage of the credentials and the cached user profile
//!
//! Every operation silently does nothing (or returns `None`) when the store is
//! detached from a backend. This is the state used where no persistent storage
//! exists, for example while rendering on a server.

use std::{fmt::Debug, sync::Arc};

use actas_shared::{
    const_config::storage_key::{
        STORAGE_KEYS_AUTH, STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_BASIC_USER_DATA,
        STORAGE_KEY_REFRESH_TOKEN,
    },
    log_err_as_error, log_err_as_warn,
    token::{AccessToken, RefreshToken},
    user::BasicUserProfile,
};
use tracing::{instrument, warn};

mod backend;

#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use backend::LocalStorage;
pub use backend::MemoryStorage;

/// A string key/value store with the same semantics as the browser's
/// `localStorage`
pub trait StorageBackend: Debug + Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    backend: Option<Arc<dyn StorageBackend>>,
}

impl CredentialStore {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    /// A store without any backend, all operations are no-ops
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    /// Persists to a json file at `path`, creating it on first write
    #[cfg(not(target_arch = "wasm32"))]
    pub fn file<P: Into<std::path::PathBuf>>(path: P) -> anyhow::Result<Self> {
        Ok(Self::new(FileStorage::open(path)?))
    }

    /// Uses `window.localStorage` and falls back to a detached store if it is
    /// not available
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        match LocalStorage::try_new() {
            Ok(backend) => Self::new(backend),
            Err(e) => {
                warn!("local storage unavailable, credentials will not persist: {e:?}");
                Self::detached()
            }
        }
    }

    pub fn is_detached(&self) -> bool {
        self.backend.is_none()
    }

    pub fn set_access_token(&self, token: &AccessToken) {
        self.write(STORAGE_KEY_ACCESS_TOKEN, token.as_str());
    }

    pub fn get_access_token(&self) -> Option<AccessToken> {
        self.read(STORAGE_KEY_ACCESS_TOKEN).map(Into::into)
    }

    pub fn set_refresh_token(&self, token: &RefreshToken) {
        self.write(STORAGE_KEY_REFRESH_TOKEN, token.as_str());
    }

    pub fn get_refresh_token(&self) -> Option<RefreshToken> {
        self.read(STORAGE_KEY_REFRESH_TOKEN).map(Into::into)
    }

    #[instrument(skip(self))]
    pub fn set_basic_user_data(&self, profile: &BasicUserProfile) {
        let json = serde_json::to_string(profile);
        log_err_as_error!(&json);
        if let Ok(json) = json {
            self.write(STORAGE_KEY_BASIC_USER_DATA, &json);
        }
    }

    /// A profile that can no longer be parsed is treated as absent
    pub fn get_basic_user_data(&self) -> Option<BasicUserProfile> {
        let json = self.read(STORAGE_KEY_BASIC_USER_DATA)?;
        match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("ignoring unreadable cached user profile: {e}");
                None
            }
        }
    }

    /// Removes the tokens, the cached profile and any chat artifacts
    #[instrument(skip(self))]
    pub fn clear_auth_storage(&self) {
        for key in STORAGE_KEYS_AUTH {
            self.remove(key);
        }
    }

    /// Only checks that both tokens are present. Expiry is discovered by the
    /// server rejecting a request
    pub fn get_is_authenticated(&self) -> bool {
        self.get_access_token().is_some() && self.get_refresh_token().is_some()
    }

    /// Empty values are treated the same as missing ones
    fn read(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(?key, "failed to read from storage: {e:?}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(backend) = self.backend.as_ref() {
            log_err_as_warn!(backend.set_item(key, value));
        }
    }

    fn remove(&self, key: &str) {
        if let Some(backend) = self.backend.as_ref() {
            log_err_as_warn!(backend.remove_item(key));
        }
    }
}
