//! Process-wide session owner.
//!
//! `SessionContext` is the only writer of the persisted session. Views and
//! the CLI read the current state through it and can subscribe to changes
//! instead of polling storage.

use std::sync::Arc;

use relab_core::{Email, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::store::{SessionStore, StoreError};
use crate::api::{ApiClient, ApiError};

/// Who is using the storefront right now.
pub enum SessionState {
    Anonymous,
    Authenticated {
        access_token: SecretString,
        /// `None` when the login response carried no profile and none was stored.
        user: Option<UserProfile>,
    },
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated { user, .. } => user.as_ref(),
            Self::Anonymous => None,
        }
    }
}

impl Clone for SessionState {
    fn clone(&self) -> Self {
        match self {
            Self::Anonymous => Self::Anonymous,
            Self::Authenticated { access_token, user } => Self::Authenticated {
                access_token: SecretString::from(access_token.expose_secret().to_owned()),
                user: user.clone(),
            },
        }
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Authenticated { user, .. } => f
                .debug_struct("Authenticated")
                .field("access_token", &"[REDACTED]")
                .field("user", user)
                .finish(),
        }
    }
}

/// Errors from logging in.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The backend rejected the credentials or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend answered without an access token.
    #[error("Login response did not include an access token")]
    MissingToken,

    /// The tokens could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Single owner of the session, shared by cloning.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<SessionContextInner>,
}

#[derive(Debug)]
struct SessionContextInner {
    store: SessionStore,
    state: watch::Sender<SessionState>,
}

impl SessionContext {
    /// Build the context from whatever the store holds.
    #[must_use]
    pub fn restore(store: SessionStore) -> Self {
        let state = match store.get_token() {
            Some(access_token) => SessionState::Authenticated {
                access_token,
                user: store.get_user(),
            },
            None => SessionState::Anonymous,
        };
        let (sender, _) = watch::channel(state);
        Self {
            inner: Arc::new(SessionContextInner {
                store,
                state: sender,
            }),
        }
    }

    /// Receive every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        match &*self.inner.state.borrow() {
            SessionState::Authenticated { access_token, .. } => Some(SecretString::from(
                access_token.expose_secret().to_owned(),
            )),
            SessionState::Anonymous => None,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Exchange credentials for tokens, persist them, and publish the new state.
    ///
    /// Returns the logged-in profile, if the backend sent or previously
    /// stored one. A response without an access token leaves the session
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Api` with the backend's message on rejection.
    #[instrument(skip(self, client, password), fields(email = %email))]
    pub async fn login(
        &self,
        client: &ApiClient,
        email: &Email,
        password: &str,
    ) -> Result<Option<UserProfile>, LoginError> {
        let response = client.auth().login(email, password).await?;
        let Some(access) = response.access.filter(|a| !a.is_empty()) else {
            warn!("Login succeeded without an access token");
            return Err(LoginError::MissingToken);
        };
        let access_token = SecretString::from(access);

        self.inner
            .store
            .save(&access_token, &response.refresh, response.user.as_ref())?;

        // A response without a profile keeps whatever was stored before.
        let user = response.user.or_else(|| self.inner.store.get_user());
        self.inner.state.send_replace(SessionState::Authenticated {
            access_token,
            user: user.clone(),
        });
        info!("Logged in");

        Ok(user)
    }

    /// End the session locally. The backend is not contacted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted keys cannot be removed; the
    /// in-memory state is anonymous either way.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), StoreError> {
        self.inner.state.send_replace(SessionState::Anonymous);
        info!("Logged out");
        self.inner.store.clear()
    }

    /// Drop a session the backend no longer accepts.
    ///
    /// The store is cleared even when the in-memory state is already
    /// anonymous.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted keys cannot be removed.
    #[instrument(skip(self))]
    pub fn invalidate(&self) -> Result<(), StoreError> {
        warn!("Access token rejected; session cleared");
        self.inner.state.send_if_modified(|state| {
            let was_authenticated = state.is_authenticated();
            *state = SessionState::Anonymous;
            was_authenticated
        });
        self.inner.store.clear()
    }
}
