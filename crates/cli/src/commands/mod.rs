//! Command implementations.
//!
//! Every command builds on the same view models as the storefront screens
//! and prints what the screen would show.

pub mod account;
pub mod cart;
pub mod catalog;

use relab_storefront::api::ApiClient;
use relab_storefront::config::StorefrontConfig;
use relab_storefront::session::{SessionContext, SessionStore};

/// Shared state for one CLI invocation.
pub struct App {
    pub config: StorefrontConfig,
    pub client: ApiClient,
    pub session: SessionContext,
}

impl App {
    /// Build the client and restore the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> relab_storefront::Result<Self> {
        let client = ApiClient::new(config.api.clone())?;
        let session = SessionContext::restore(SessionStore::file(&config.session_file));
        tracing::debug!(
            session_file = %config.session_file.display(),
            authenticated = session.is_authenticated(),
            "Session restored"
        );
        Ok(Self {
            config,
            client,
            session,
        })
    }
}
