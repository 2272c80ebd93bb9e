//! Shared in-memory view of the session, kept in step with the
//! [`CredentialStore`]
//!
//! All token changes must go through [`SessionState`] so that anything
//! watching it (the UI) sees the same values as the store.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};

use actas_shared::{
    token::{AccessToken, CredentialPair, RefreshToken},
    user::BasicUserProfile,
};
use tracing::{debug, info, instrument};

use crate::store::CredentialStore;

pub trait WakeFn: Fn() + Send + Sync + 'static {}
impl<T> WakeFn for T where T: Fn() + Send + Sync + 'static {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    pub user: Option<BasicUserProfile>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }
}

#[derive(Clone)]
pub struct SessionState {
    inner: Arc<Mutex<SessionInner>>,
}

struct SessionInner {
    store: CredentialStore,
    snapshot: SessionSnapshot,
    listeners: Vec<Arc<dyn Fn() + Send + Sync>>,
}

impl Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock().expect("mutex poisoned");
        f.debug_struct("SessionState")
            .field("snapshot", &guard.snapshot)
            .field("store", &guard.store)
            .field("listener_count", &guard.listeners.len())
            .finish()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::hydrate(CredentialStore::detached())
    }
}

impl SessionState {
    /// Loads whatever the store has. A cached profile without both tokens is
    /// ignored and the session starts unauthenticated
    #[instrument]
    pub fn hydrate(store: CredentialStore) -> Self {
        let access_token = store.get_access_token();
        let refresh_token = store.get_refresh_token();
        let snapshot = if access_token.is_some() && refresh_token.is_some() {
            SessionSnapshot {
                access_token,
                refresh_token,
                user: store.get_basic_user_data(),
            }
        } else {
            if store.get_basic_user_data().is_some() {
                debug!("cached profile found without credentials, ignoring it");
            }
            SessionSnapshot::default()
        };
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                store,
                snapshot,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().expect("mutex poisoned").snapshot.clone()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .snapshot
            .access_token
            .clone()
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .snapshot
            .refresh_token
            .clone()
    }

    pub fn user(&self) -> Option<BasicUserProfile> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .snapshot
            .user
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .snapshot
            .is_authenticated()
    }

    /// The store backing this session, for code that must read the persisted
    /// flags directly (the route guards)
    pub fn store(&self) -> CredentialStore {
        self.inner.lock().expect("mutex poisoned").store.clone()
    }

    /// Registers `wake_fn` to be called after every change to the session
    pub fn subscribe<F: WakeFn>(&self, wake_fn: F) {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .listeners
            .push(Arc::new(wake_fn));
    }

    #[instrument(skip(self))]
    pub fn login(&self, credentials: CredentialPair, user: BasicUserProfile) {
        self.update(|inner| {
            inner.store.set_access_token(&credentials.access_token);
            inner.store.set_refresh_token(&credentials.refresh_token);
            inner.store.set_basic_user_data(&user);
            inner.snapshot = SessionSnapshot {
                access_token: Some(credentials.access_token),
                refresh_token: Some(credentials.refresh_token),
                user: Some(user),
            };
            true
        });
        info!("session started");
    }

    /// Replaces both tokens, the profile is left as is
    #[instrument(skip(self))]
    pub fn set_tokens(&self, credentials: CredentialPair) {
        self.update(|inner| {
            inner.store.set_access_token(&credentials.access_token);
            inner.store.set_refresh_token(&credentials.refresh_token);
            inner.snapshot.access_token = Some(credentials.access_token);
            inner.snapshot.refresh_token = Some(credentials.refresh_token);
            true
        });
    }

    /// Safe to call any number of times. Listeners are only woken if there was
    /// something to clear
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.update(|inner| {
            inner.store.clear_auth_storage();
            let was_empty = inner.snapshot == SessionSnapshot::default();
            inner.snapshot = SessionSnapshot::default();
            if !was_empty {
                info!("session ended");
            }
            !was_empty
        });
    }

    /// Applies `f` under the lock then wakes listeners (outside the lock) if it
    /// returned true
    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionInner) -> bool,
    {
        let listeners = {
            let mut guard = self.inner.lock().expect("mutex poisoned");
            if !f(&mut *guard) {
                return;
            }
            guard.listeners.clone()
        };
        for listener in listeners {
            listener();
        }
    }
}
